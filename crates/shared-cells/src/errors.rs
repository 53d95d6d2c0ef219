//! Cell error types.

use thiserror::Error;

/// Errors raised while building, reading or (de)serializing cells.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// Writing would exceed the data capacity of a cell.
    #[error("cell overflow: {requested} bits requested, {available} available")]
    BitOverflow {
        /// Bits the write needed
        requested: usize,
        /// Bits still free in the cell
        available: usize,
    },

    /// Writing would exceed the reference capacity of a cell.
    #[error("cell overflow: at most {max} refs per cell")]
    RefOverflow {
        /// Maximum refs per cell
        max: usize,
    },

    /// A reference would push the tree past the maximum depth.
    #[error("cell depth exceeds {max}")]
    DepthOverflow {
        /// Maximum tree depth
        max: u16,
    },

    /// Reading past the end of the data bits.
    #[error("cell underflow: {requested} bits requested, {remaining} remaining")]
    BitUnderflow {
        /// Bits the read needed
        requested: usize,
        /// Bits left in the slice
        remaining: usize,
    },

    /// Reading past the last reference.
    #[error("cell underflow: no refs left")]
    RefUnderflow,

    /// Data left over after a structure was fully read.
    #[error("unexpected trailing data: {bits} bits, {refs} refs")]
    TrailingData {
        /// Unread bits
        bits: usize,
        /// Unread refs
        refs: usize,
    },

    /// Integer width outside the supported range.
    #[error("unsupported integer width: {0} bits")]
    InvalidWidth(usize),

    /// Integer does not fit in the requested width.
    #[error("value does not fit in {bits} bits")]
    ValueTooWide {
        /// Requested width
        bits: usize,
    },

    /// Amount needs more than 120 bits.
    #[error("coin amount exceeds 120 bits")]
    CoinsOverflow,

    /// Malformed or unsupported address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed decimal amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Snake string cell holds a partial byte or more than one continuation.
    #[error("invalid snake string: {0}")]
    InvalidSnake(String),

    /// Malformed or unsupported bag of cells.
    #[error("invalid bag of cells: {0}")]
    InvalidBoc(String),
}
