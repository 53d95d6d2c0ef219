//! # Adapters Layer (Outer Hexagon)
//!
//! Implementations of the driven ports.

pub mod ledger;

pub use ledger::*;
