//! # Shared Cells - Bit-Level Storage Primitives
//!
//! Every persistent structure and every message handled by the registry is a
//! tree of cells. This crate owns that representation and the byte codec.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `cell` | Immutable cell, representation hash, depth |
//! | `builder` | Bit-level writer producing cells |
//! | `slice` | Bit-level reader over a cell |
//! | `address` | Standard internal address (267 bits) |
//! | `coins` | `VarUInteger 16` amounts in nano-units |
//! | `snake` | Byte strings chained across cells |
//! | `boc` | Bag-of-cells byte serialization |
//!
//! ## Hashing
//!
//! Representation hashes are SHA-256 over the standard cell encoding
//! (descriptors, padded data, child depths, child hashes). Two cells are equal
//! iff their representation hashes are equal.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod boc;
pub mod builder;
pub mod cell;
pub mod coins;
pub mod errors;
pub mod slice;
pub mod snake;

// Re-exports
pub use address::MsgAddress;
pub use boc::{deserialize_boc, serialize_boc};
pub use builder::CellBuilder;
pub use cell::{ArcCell, Cell, MAX_DATA_BITS, MAX_DEPTH, MAX_REFS};
pub use coins::Coins;
pub use errors::CellError;
pub use slice::CellSlice;
pub use snake::{decode_snake, encode_snake};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
