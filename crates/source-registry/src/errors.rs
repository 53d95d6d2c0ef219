//! # Error Types
//!
//! Every rejection maps to a distinct, stable exit code. Callers outside the
//! core assert on those codes, so they never change.

use crate::domain::invariants::exit_codes;
use shared_cells::{CellError, Coins, MsgAddress};
use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Rejections produced by the registry state machine and its codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Sender is not the party allowed to perform the operation.
    #[error("unauthorized sender: {sender}")]
    Unauthorized { sender: MsgAddress },

    /// Attached value below the configured minimum fee.
    #[error("attached value {value} below minimum fee {min}")]
    FeeBelowMinimum { value: Coins, min: Coins },

    /// Attached value above the configured maximum fee.
    #[error("attached value {value} above maximum fee {max}")]
    FeeAboveMaximum { value: Coins, max: Coins },

    /// Code replacement with an empty cell.
    #[error("code cell must not be empty")]
    EmptyCode,

    /// New minimum fee below the protocol floor.
    #[error("minimum fee {min} below protocol floor {floor}")]
    MinFeeBelowFloor { min: Coins, floor: Coins },

    /// Truncated or otherwise malformed frame.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] CellError),

    /// Frame carries an operation tag this registry does not know.
    #[error("unknown operation: {0:#x}")]
    UnknownOperation(u32),

    /// Key material that does not decode to the expected form.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// Error taxonomy used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Sender mismatch.
    Authorization,
    /// Fee outside the configured or protocol range.
    Bounds,
    /// Empty code payload.
    EmptyPayload,
    /// Malformed frame or key encoding.
    Encoding,
    /// Unrecognized operation tag.
    UnknownOperation,
}

impl RegistryError {
    /// Exit code reported for this rejection.
    #[must_use]
    pub fn exit_code(&self) -> u32 {
        match self {
            Self::Unauthorized { .. } => exit_codes::UNAUTHORIZED,
            Self::FeeBelowMinimum { .. } => exit_codes::FEE_BELOW_MINIMUM,
            Self::FeeAboveMaximum { .. } => exit_codes::FEE_ABOVE_MAXIMUM,
            Self::EmptyCode => exit_codes::EMPTY_CODE,
            Self::MinFeeBelowFloor { .. } => exit_codes::MIN_FEE_BELOW_FLOOR,
            Self::MalformedMessage(_) | Self::InvalidEncoding(_) => exit_codes::MALFORMED_MESSAGE,
            Self::UnknownOperation(_) => exit_codes::UNKNOWN_OPERATION,
        }
    }

    /// Category of this rejection.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Authorization,
            Self::FeeBelowMinimum { .. }
            | Self::FeeAboveMaximum { .. }
            | Self::MinFeeBelowFloor { .. } => ErrorCategory::Bounds,
            Self::EmptyCode => ErrorCategory::EmptyPayload,
            Self::MalformedMessage(_) | Self::InvalidEncoding(_) => ErrorCategory::Encoding,
            Self::UnknownOperation(_) => ErrorCategory::UnknownOperation,
        }
    }
}

// =============================================================================
// CHILD RECORD ERRORS
// =============================================================================

/// Rejections produced by a child record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChildError {
    /// Sender is not the creating registry.
    #[error("unauthorized sender: {sender}")]
    Unauthorized { sender: MsgAddress },

    /// Content pointer was already set.
    #[error("content pointer already set")]
    AlreadyInitialized,

    /// Body or persistent data could not be decoded.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] CellError),
}

impl ChildError {
    /// Exit code reported for this rejection.
    #[must_use]
    pub fn exit_code(&self) -> u32 {
        match self {
            Self::Unauthorized { .. } => exit_codes::UNAUTHORIZED,
            Self::AlreadyInitialized => exit_codes::ALREADY_INITIALIZED,
            Self::MalformedMessage(_) => exit_codes::MALFORMED_MESSAGE,
        }
    }
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from the ledger port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No child record lives at the address.
    #[error("no child record at {0}")]
    ChildNotFound(MsgAddress),

    /// Destination does not match the hash of the carried initial state.
    #[error("destination {destination} does not match initial state address {expected}")]
    AddressMismatch {
        destination: MsgAddress,
        expected: MsgAddress,
    },

    /// Initial state could not be turned into a child record.
    #[error("invalid initial state: {0}")]
    InvalidStateInit(#[from] CellError),

    /// The ledger is not reachable.
    #[error("ledger unavailable")]
    Unavailable,
}

// =============================================================================
// TESTS
// =============================================================================
