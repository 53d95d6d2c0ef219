//! # Driving Port (API - Inbound)
//!
//! What the surrounding environment calls on a deployed registry: deliver a
//! message, run a read-only query.

use crate::domain::entities::SourceItemData;
use crate::domain::value_objects::{Coins, ContentKey, MsgAddress, VerifierKey};
use crate::errors::{LedgerError, RegistryError};
use crate::events::{InboundMessagePayload, MessageReceipt};
use async_trait::async_trait;

/// Public API of a registry.
#[async_trait]
pub trait SourceRegistryApi: Send + Sync {
    /// Processes one inbound message to completion.
    ///
    /// Never fails: rejections are reported through the receipt's exit code.
    async fn process(&self, message: InboundMessagePayload) -> MessageReceipt;

    /// Address of the child record for the given key halves.
    async fn child_address(
        &self,
        verifier_key: VerifierKey,
        content_key: ContentKey,
    ) -> Result<MsgAddress, RegistryError>;

    /// Current admin.
    async fn admin(&self) -> MsgAddress;

    /// Current verifier source.
    async fn verifier_source(&self) -> MsgAddress;

    /// Current `(min_fee, max_fee)`.
    async fn fee_bounds(&self) -> (Coins, Coins);

    /// Representation hash of the registry's current code.
    async fn code_hash(&self) -> [u8; 32];

    /// Read-only view of a deployed child record.
    async fn source_item(&self, address: MsgAddress) -> Result<SourceItemData, LedgerError>;
}
