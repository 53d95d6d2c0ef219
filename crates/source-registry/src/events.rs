//! # Event Schema
//!
//! Payloads the registry service accepts and emits. Every receipt carries the
//! correlation id of the handler invocation that produced it.

use crate::domain::value_objects::{Coins, ContentKey, MsgAddress, VerifierKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// INBOUND
// =============================================================================

/// A message delivered to the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessagePayload {
    /// Sender address.
    pub sender: MsgAddress,
    /// Attached value.
    pub value: Coins,
    /// Body as bag-of-cells bytes.
    pub body: Vec<u8>,
    /// Bounce of a message the registry sent earlier.
    pub bounced: bool,
}

impl InboundMessagePayload {
    /// A regular inbound message.
    #[must_use]
    pub fn new(sender: MsgAddress, value: Coins, body: Vec<u8>) -> Self {
        Self {
            sender,
            value,
            body,
            bounced: false,
        }
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// Result of handling one inbound message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Correlation id of the handler call.
    pub correlation_id: Uuid,
    /// 0 on success, otherwise the rejection's exit code.
    pub exit_code: u32,
    /// Query id echoed from the frame, when its header could be read.
    pub query_id: Option<u64>,
    /// Address of the child record a deploy targeted.
    pub deployed_address: Option<MsgAddress>,
    /// Exit code of the child when the forwarded body was delivered.
    pub child_exit_code: Option<u32>,
}

impl MessageReceipt {
    /// Returns true if the registry accepted the message.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Notable state changes, published after commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A child record was created or re-targeted by a deploy.
    SourceDeployed {
        /// Child address.
        address: MsgAddress,
        /// Verifier half of the key.
        verifier_key: VerifierKey,
        /// Content half of the key.
        content_key: ContentKey,
        /// Value forwarded to the child.
        value: Coins,
    },
    /// Admin, verifier source, fee bounds or child code changed.
    ConfigurationChanged {
        /// Operation name.
        operation: String,
    },
    /// The registry's own code was replaced.
    CodeReplaced {
        /// Representation hash of the new code.
        code_hash: [u8; 32],
    },
}

impl RegistryEvent {
    /// Topic the event is published on.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::SourceDeployed { .. } => topics::SOURCE_DEPLOYED,
            Self::ConfigurationChanged { .. } => topics::CONFIGURATION_CHANGED,
            Self::CodeReplaced { .. } => topics::CODE_REPLACED,
        }
    }
}

/// Topic names.
pub mod topics {
    /// Child deployments.
    pub const SOURCE_DEPLOYED: &str = "source_registry.source.deployed";

    /// Configuration changes.
    pub const CONFIGURATION_CHANGED: &str = "source_registry.config.changed";

    /// Registry code replacement.
    pub const CODE_REPLACED: &str = "source_registry.code.replaced";
}
