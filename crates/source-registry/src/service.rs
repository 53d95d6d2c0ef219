//! # Registry Service
//!
//! Wires the registry state machine to its ledger.
//!
//! Each inbound message is processed to completion under the registry's
//! write lock: decode, apply, commit. A deploy action is then handed to the
//! ledger. Rejections never reach the ledger and leave the registry as it was.

use crate::adapters::InMemoryLedger;
use crate::codec::{peek_query_id, RegistryOperation};
use crate::config::ServiceConfig;
use crate::domain::entities::{OutAction, RegistryAccount, RegistryState, SourceItemData};
use crate::domain::registry::{handle_inbound, Processed};
use crate::domain::services::{derive_child_address, derive_source_key};
use crate::domain::value_objects::{
    ArcCell, Coins, ContentKey, MessageContext, MsgAddress, SourceKey, VerifierKey,
};
use crate::errors::{LedgerError, RegistryError};
use crate::events::{InboundMessagePayload, MessageReceipt, RegistryEvent};
use crate::ports::inbound::SourceRegistryApi;
use crate::ports::outbound::LedgerAccess;

use async_trait::async_trait;
use shared_cells::{deserialize_boc, CellBuilder, CellError};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Statistics for the registry service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Messages handled, bounces included.
    pub messages_processed: u64,
    /// Deploy actions handed to the ledger.
    pub deployments: u64,
    /// Admin operations applied.
    pub configuration_changes: u64,
    /// Rejected messages.
    pub rejected_messages: u64,
    /// Bounced messages ignored.
    pub bounced_messages: u64,
    /// Forwarded bodies a child record refused.
    pub child_rejections: u64,
    /// Events evicted before anyone drained them.
    pub dropped_events: u64,
}

/// A deployed registry and the ledger its children live on.
pub struct RegistryService<L: LedgerAccess> {
    /// Service configuration.
    config: ServiceConfig,
    /// Registry address, code and state.
    account: Arc<RwLock<RegistryAccount>>,
    /// Ledger adapter.
    ledger: Arc<L>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
    /// Events published since the last `take_events`, oldest first.
    events: Arc<RwLock<VecDeque<RegistryEvent>>>,
}

impl<L: LedgerAccess> RegistryService<L> {
    /// Deploys a registry with the given code and initial state.
    pub fn new(
        ledger: Arc<L>,
        config: ServiceConfig,
        code: ArcCell,
        state: RegistryState,
    ) -> Result<Self, CellError> {
        let account = RegistryAccount::deploy(config.workchain, code, state)?;
        info!(address = %account.address, "Registry deployed");
        Ok(Self {
            config,
            account: Arc::new(RwLock::new(account)),
            ledger,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
            events: Arc::new(RwLock::new(VecDeque::new())),
        })
    }

    /// Service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Ledger the registry deploys to.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Registry address.
    pub async fn address(&self) -> MsgAddress {
        self.account.read().await.address
    }

    /// Snapshot of the registry state.
    pub async fn state(&self) -> RegistryState {
        self.account.read().await.state.clone()
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Drains the events published so far.
    ///
    /// At most `max_pending_events` are retained between drains; older ones
    /// are evicted and counted in `ServiceStats::dropped_events`.
    pub async fn take_events(&self) -> Vec<RegistryEvent> {
        self.events.write().await.drain(..).collect()
    }

    /// Handles a regular message carrying a bag-of-cells body.
    pub async fn handle_message(&self, sender: MsgAddress, value: Coins, body: &[u8]) -> MessageReceipt {
        self.handle(
            Uuid::new_v4(),
            InboundMessagePayload::new(sender, value, body.to_vec()),
        )
        .await
    }

    /// Child address for textual key inputs.
    pub async fn child_address_for(
        &self,
        submitter_identity: &str,
        content_hash: &str,
    ) -> Result<MsgAddress, RegistryError> {
        let key = derive_source_key(submitter_identity, content_hash)?;
        self.derive_address(&key).await
    }

    async fn derive_address(&self, key: &SourceKey) -> Result<MsgAddress, RegistryError> {
        let account = self.account.read().await;
        Ok(derive_child_address(key, &account.address, &account.state.child_code)?)
    }

    /// Processes one inbound message to completion.
    #[instrument(
        skip(self, message),
        fields(correlation_id = %correlation_id, sender = %message.sender, value = %message.value)
    )]
    pub async fn handle(&self, correlation_id: Uuid, message: InboundMessagePayload) -> MessageReceipt {
        self.stats.write().await.messages_processed += 1;

        if message.bounced {
            debug!("Ignoring bounced message");
            self.stats.write().await.bounced_messages += 1;
            return MessageReceipt {
                correlation_id,
                exit_code: 0,
                query_id: None,
                deployed_address: None,
                child_exit_code: None,
            };
        }

        if message.body.len() > self.config.max_body_bytes {
            let err = RegistryError::MalformedMessage(CellError::InvalidBoc(format!(
                "body of {} bytes exceeds limit of {}",
                message.body.len(),
                self.config.max_body_bytes
            )));
            return self.reject(correlation_id, None, err).await;
        }

        let root = match deserialize_boc(&message.body) {
            Ok(root) => root,
            Err(e) => return self.reject(correlation_id, None, e.into()).await,
        };

        let (processed, deploy, registry_address) = {
            let mut account = self.account.write().await;
            let ctx = MessageContext::new(message.sender, message.value, account.address);
            let processed = match handle_inbound(&account.state, &ctx, &root) {
                Ok(processed) => processed,
                Err(e) => {
                    drop(account);
                    return self.reject(correlation_id, peek_query_id(&root), e).await;
                }
            };
            let deploy = account.commit(processed.transition.clone());
            (processed, deploy, account.address)
        };
        if let Some(event) = describe(&processed) {
            self.publish(event).await;
        }
        let query_id = processed.query_id();

        let Some(action) = deploy else {
            if let Some(message) = &processed.message {
                info!(operation = message.operation.name(), "Registry reconfigured");
                self.stats.write().await.configuration_changes += 1;
            }
            return MessageReceipt {
                correlation_id,
                exit_code: 0,
                query_id,
                deployed_address: None,
                child_exit_code: None,
            };
        };

        let destination = action.destination;
        info!(%destination, value = %action.value, "Deploying source item");
        self.stats.write().await.deployments += 1;

        let child_exit_code = match self.ledger.deploy_child(action, registry_address).await {
            Ok(delivery) => {
                if delivery.exit_code != 0 {
                    warn!(
                        %destination,
                        created = delivery.created,
                        child_exit_code = delivery.exit_code,
                        "Source item refused forwarded body"
                    );
                    self.stats.write().await.child_rejections += 1;
                }
                Some(delivery.exit_code)
            }
            Err(e) => {
                error!(%destination, error = %e, "Ledger failed to execute deploy action");
                None
            }
        };

        MessageReceipt {
            correlation_id,
            exit_code: 0,
            query_id,
            deployed_address: Some(destination),
            child_exit_code,
        }
    }

    async fn reject(
        &self,
        correlation_id: Uuid,
        query_id: Option<u64>,
        err: RegistryError,
    ) -> MessageReceipt {
        warn!(
            exit_code = err.exit_code(),
            category = ?err.category(),
            error = %err,
            "Message rejected"
        );
        self.stats.write().await.rejected_messages += 1;
        MessageReceipt {
            correlation_id,
            exit_code: err.exit_code(),
            query_id,
            deployed_address: None,
            child_exit_code: None,
        }
    }

    async fn publish(&self, event: RegistryEvent) {
        let mut events = self.events.write().await;
        events.push_back(event);
        let excess = events.len().saturating_sub(self.config.max_pending_events);
        if excess > 0 {
            events.drain(..excess);
            drop(events);
            debug!(excess, "Undrained events evicted");
            self.stats.write().await.dropped_events += excess as u64;
        }
    }
}

fn describe(processed: &Processed) -> Option<RegistryEvent> {
    let message = processed.message.as_ref()?;
    Some(match &message.operation {
        RegistryOperation::DeploySource { key, .. } => {
            let Some(OutAction::Deploy(action)) = &processed.transition.action else {
                return None;
            };
            RegistryEvent::SourceDeployed {
                address: action.destination,
                verifier_key: key.verifier,
                content_key: key.content,
                value: action.value,
            }
        }
        RegistryOperation::ReplaceRegistryCode(code) => RegistryEvent::CodeReplaced {
            code_hash: code.repr_hash(),
        },
        other => RegistryEvent::ConfigurationChanged {
            operation: other.name().to_string(),
        },
    })
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Admin of the registry built by `create_test_service`.
pub const TEST_ADMIN: MsgAddress = MsgAddress::new(0, [0xAA; 32]);

/// Verifier source of the registry built by `create_test_service`.
pub const TEST_VERIFIER_SOURCE: MsgAddress = MsgAddress::new(0, [0xBB; 32]);

/// A registry with `min_fee = 0.065`, `max_fee = 1` and the test parties,
/// on a fresh in-memory ledger.
pub fn create_test_service() -> Result<RegistryService<InMemoryLedger>, CellError> {
    let mut code = CellBuilder::new();
    code.store_bytes(b"source-registry")?;
    let mut child_code = CellBuilder::new();
    child_code.store_bytes(b"source-item")?;

    let state = RegistryState {
        admin: TEST_ADMIN,
        verifier_source: TEST_VERIFIER_SOURCE,
        min_fee: Coins::from_nano(65_000_000),
        max_fee: Coins::from_units(1),
        child_code: Arc::new(child_code.build()?),
    };
    RegistryService::new(
        Arc::new(InMemoryLedger::new()),
        ServiceConfig::default(),
        Arc::new(code.build()?),
        state,
    )
}

// =============================================================================
// SourceRegistryApi Implementation
// =============================================================================

#[async_trait]
impl<L: LedgerAccess> SourceRegistryApi for RegistryService<L> {
    async fn process(&self, message: InboundMessagePayload) -> MessageReceipt {
        self.handle(Uuid::new_v4(), message).await
    }

    async fn child_address(
        &self,
        verifier_key: VerifierKey,
        content_key: ContentKey,
    ) -> Result<MsgAddress, RegistryError> {
        self.derive_address(&SourceKey::new(verifier_key, content_key))
            .await
    }

    async fn admin(&self) -> MsgAddress {
        self.account.read().await.state.admin
    }

    async fn verifier_source(&self) -> MsgAddress {
        self.account.read().await.state.verifier_source
    }

    async fn fee_bounds(&self) -> (Coins, Coins) {
        let account = self.account.read().await;
        (account.state.min_fee, account.state.max_fee)
    }

    async fn code_hash(&self) -> [u8; 32] {
        self.account.read().await.code.repr_hash()
    }

    async fn source_item(&self, address: MsgAddress) -> Result<SourceItemData, LedgerError> {
        self.ledger.child_data(address).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
