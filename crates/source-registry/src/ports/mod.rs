//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `SourceRegistryApi`
//! - **Driven Port (Outbound)**: `LedgerAccess`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
