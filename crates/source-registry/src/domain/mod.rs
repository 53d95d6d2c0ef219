//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry logic: key and address derivation, the registry state
//! machine and the child record state machine.
//! NO I/O, NO async.
//!
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).
//! - Every operation is a finite synchronous computation over explicit state.

pub mod child;
pub mod entities;
pub mod invariants;
pub mod registry;
pub mod services;
pub mod value_objects;

pub use child::*;
pub use entities::*;
pub use invariants::*;
pub use registry::*;
pub use services::*;
pub use value_objects::*;
