//! # Domain Invariants
//!
//! Checks every registry operation runs before it mutates anything.
//!
//! | ID | Invariant | Check |
//! |----|-----------|-------|
//! | INVARIANT-1 | Only the verifier source deploys | `check_sender` |
//! | INVARIANT-2 | Only the admin reconfigures | `check_sender` |
//! | INVARIANT-3 | `min_fee <= value <= max_fee` on deploy | `check_fee_window` |
//! | INVARIANT-4 | Code replacements are non-empty | `check_code_not_empty` |
//! | INVARIANT-5 | `min_fee >= MIN_FEE_FLOOR` on update | `check_min_fee_floor` |
//!
//! `max_fee` has no check of its own and is not compared with `min_fee`.

use crate::domain::value_objects::{Cell, Coins, MsgAddress};
use crate::errors::RegistryError;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1 / INVARIANT-2: the sender must be the authorized party.
pub fn check_sender(authorized: &MsgAddress, sender: &MsgAddress) -> Result<(), RegistryError> {
    if authorized == sender {
        Ok(())
    } else {
        Err(RegistryError::Unauthorized { sender: *sender })
    }
}

/// INVARIANT-3: the attached value lies in `[min, max]`, both inclusive.
///
/// The lower bound is checked first.
pub fn check_fee_window(value: Coins, min: Coins, max: Coins) -> Result<(), RegistryError> {
    if value < min {
        return Err(RegistryError::FeeBelowMinimum { value, min });
    }
    if value > max {
        return Err(RegistryError::FeeAboveMaximum { value, max });
    }
    Ok(())
}

/// INVARIANT-4: a code cell must carry data or refs.
pub fn check_code_not_empty(code: &Cell) -> Result<(), RegistryError> {
    if code.is_empty() {
        Err(RegistryError::EmptyCode)
    } else {
        Ok(())
    }
}

/// INVARIANT-5: a new minimum fee respects the protocol floor.
pub fn check_min_fee_floor(min: Coins) -> Result<(), RegistryError> {
    if min < limits::MIN_FEE_FLOOR {
        Err(RegistryError::MinFeeBelowFloor {
            min,
            floor: limits::MIN_FEE_FLOOR,
        })
    } else {
        Ok(())
    }
}

// =============================================================================
// PROTOCOL CONSTANTS
// =============================================================================

/// Protocol limits.
pub mod limits {
    use super::Coins;

    /// Lowest acceptable `min_fee`: 0.05 native units.
    pub const MIN_FEE_FLOOR: Coins = Coins::from_nano(50_000_000);
}

/// Exit codes reported for every outcome.
pub mod exit_codes {
    /// Message applied.
    pub const SUCCESS: u32 = 0;

    /// Frame could not be decoded (cell underflow).
    pub const MALFORMED_MESSAGE: u32 = 9;

    /// Sender is not authorized.
    pub const UNAUTHORIZED: u32 = 401;

    /// Attached value below `min_fee`.
    pub const FEE_BELOW_MINIMUM: u32 = 900;

    /// Attached value above `max_fee`.
    pub const FEE_ABOVE_MAXIMUM: u32 = 901;

    /// Empty code cell.
    pub const EMPTY_CODE: u32 = 902;

    /// New `min_fee` below the protocol floor.
    pub const MIN_FEE_BELOW_FLOOR: u32 = 903;

    /// Child record received a second set-content message.
    pub const ALREADY_INITIALIZED: u32 = 1001;

    /// Unrecognized operation tag.
    pub const UNKNOWN_OPERATION: u32 = 0xFFFF;
}

// =============================================================================
// TESTS
// =============================================================================
