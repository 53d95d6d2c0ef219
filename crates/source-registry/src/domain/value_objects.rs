//! # Value Objects
//!
//! Immutable domain primitives for the registry.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use shared_cells::{ArcCell, Cell, Coins, MsgAddress};

// =============================================================================
// VERIFIER KEY (32 bytes)
// =============================================================================

/// Digest of the submitter identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VerifierKey(pub [u8; 32]);

impl VerifierKey {
    /// Creates a key from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for VerifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifierKey({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for VerifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// =============================================================================
// CONTENT KEY (32 bytes)
// =============================================================================

/// Raw 256-bit content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentKey(pub [u8; 32]);

impl ContentKey {
    /// Creates a key from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// =============================================================================
// SOURCE KEY
// =============================================================================

/// The pair identifying one child record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    /// Digest of the submitter identity.
    pub verifier: VerifierKey,
    /// Raw content hash.
    pub content: ContentKey,
}

impl SourceKey {
    /// Creates a key pair.
    #[must_use]
    pub const fn new(verifier: VerifierKey, content: ContentKey) -> Self {
        Self { verifier, content }
    }
}

// =============================================================================
// MESSAGE CONTEXT
// =============================================================================

/// Who sent the inbound message, to whom, and with what value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageContext {
    /// Sender of the inbound message.
    pub sender: MsgAddress,
    /// Value attached to the message.
    pub value: Coins,
    /// Address of the receiving registry.
    pub receiver: MsgAddress,
    /// The message is a bounce of one this registry sent.
    pub bounced: bool,
}

impl MessageContext {
    /// Creates a context for a regular (non-bounced) message.
    #[must_use]
    pub const fn new(sender: MsgAddress, value: Coins, receiver: MsgAddress) -> Self {
        Self {
            sender,
            value,
            receiver,
            bounced: false,
        }
    }

    /// Marks the message as bounced.
    #[must_use]
    pub const fn bounced(mut self) -> Self {
        self.bounced = true;
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
