//! # Source Registry Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Derivation and codec throughput
//! └── src/integration/
//!     ├── scenarios.rs  # Registry + ledger end to end
//!     └── wire.rs       # Bit-exact hashes, addresses and frames
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sr-tests
//! cargo test -p sr-tests integration::wire
//! cargo bench -p sr-tests
//! ```

pub mod integration;
