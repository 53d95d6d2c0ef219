//! # Source Registry - Deterministic Child Record Deployment
//!
//! A registry that deploys uniquely addressed child records ("source items"),
//! each keyed by a submitter identity and a content hash. The registry decides
//! who may create records, what value must accompany a creation, and who may
//! reconfigure the registry itself.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Only the verifier source deploys | `domain/invariants.rs` - `check_sender()` |
//! | INVARIANT-2 | Only the admin reconfigures | `domain/invariants.rs` - `check_sender()` |
//! | INVARIANT-3 | Deploy value within `[min_fee, max_fee]` | `domain/invariants.rs` - `check_fee_window()` |
//! | INVARIANT-4 | Code replacements are non-empty | `domain/invariants.rs` - `check_code_not_empty()` |
//! | INVARIANT-5 | `min_fee` respects the protocol floor | `domain/invariants.rs` - `check_min_fee_floor()` |
//! | INVARIANT-6 | A child accepts one set-content message, from its registry | `domain/child.rs` - `ChildRecordState::receive()` |
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 9 | Malformed message |
//! | 401 | Unauthorized sender |
//! | 900 | Value below minimum fee |
//! | 901 | Value above maximum fee |
//! | 902 | Empty code |
//! | 903 | Minimum fee below protocol floor |
//! | 1001 | Child record already initialized |
//! | 0xFFFF | Unknown operation |
//!
//! ## Address Derivation
//!
//! ```text
//! verifier_key = SHA-256(submitter identity)
//! content_key  = base64-decode(content hash)            (32 bytes)
//! data         = verifier_key content_key registry 0    (maybe bit: no content)
//! state_init   = 00110 ^code ^data
//! address      = registry.workchain : repr_hash(state_init)
//! ```
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `LedgerAccess` | Create child records and deliver their set-content message |
//!
//! ## Usage Example
//!
//! ```ignore
//! use source_registry::prelude::*;
//!
//! let service = create_test_service()?;
//! let body = RegistryMessage::deploy_source(1, "my verifier", hash, b"https://x/y.json")?
//!     .to_boc()?;
//! let receipt = service
//!     .handle_message(TEST_VERIFIER_SOURCE, "0.5".parse()?, &body)
//!     .await;
//! assert_eq!(receipt.exit_code, 0);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod codec;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        DeployAction, OutAction, RegistryAccount, RegistryState, SourceItemData, StateInit,
        Transition,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        ArcCell, Cell, Coins, ContentKey, MessageContext, MsgAddress, SourceKey, VerifierKey,
    };

    // Domain services
    pub use crate::domain::services::{
        child_initial_data, child_state_init, decode_content_key, derive_child_address,
        derive_source_key, derive_verifier_key,
    };

    // State machines
    pub use crate::domain::child::{ChildPhase, ChildRecordState};
    pub use crate::domain::registry::{apply, handle_inbound, Processed};

    // Invariants
    pub use crate::domain::invariants::{exit_codes, limits};

    // Codec
    pub use crate::codec::{
        child_set_content_body, opcodes, parse_child_body, RegistryMessage, RegistryOperation,
    };

    // Ports
    pub use crate::ports::inbound::SourceRegistryApi;
    pub use crate::ports::outbound::{ChildDelivery, LedgerAccess};

    // Events
    pub use crate::events::{topics, InboundMessagePayload, MessageReceipt, RegistryEvent};

    // Errors
    pub use crate::errors::{ChildError, ErrorCategory, LedgerError, RegistryError};

    // Adapters
    pub use crate::adapters::InMemoryLedger;

    // Configuration
    pub use crate::config::ServiceConfig;

    // Service
    pub use crate::service::{
        create_test_service, RegistryService, ServiceStats, TEST_ADMIN, TEST_VERIFIER_SOURCE,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
