//! Cross-component tests.

pub mod scenarios;
pub mod wire;
