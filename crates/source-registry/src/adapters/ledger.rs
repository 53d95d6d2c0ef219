//! # In-Memory Ledger
//!
//! Holds child records keyed by address and runs their message handling.
//! Stands in for the real ledger in tests and local tooling.

use crate::domain::child::ChildRecordState;
use crate::domain::entities::{DeployAction, SourceItemData};
use crate::domain::invariants::exit_codes;
use crate::domain::value_objects::{Cell, MsgAddress};
use crate::errors::LedgerError;
use crate::ports::outbound::{ChildDelivery, LedgerAccess};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// In-memory child record store.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    children: RwLock<HashMap<MsgAddress, ChildRecordState>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of child records.
    pub async fn len(&self) -> usize {
        self.children.read().await.len()
    }

    /// Returns true if no child record exists.
    pub async fn is_empty(&self) -> bool {
        self.children.read().await.is_empty()
    }

    /// Returns true if a child record lives at `address`.
    pub async fn contains(&self, address: &MsgAddress) -> bool {
        self.children.read().await.contains_key(address)
    }

    /// Delivers a message body to an existing child and returns its exit code.
    ///
    /// The child's state only changes when it accepts the body.
    pub async fn deliver(
        &self,
        address: MsgAddress,
        sender: MsgAddress,
        body: &Cell,
    ) -> Result<u32, LedgerError> {
        let mut children = self.children.write().await;
        let child = children
            .get_mut(&address)
            .ok_or(LedgerError::ChildNotFound(address))?;
        Ok(match child.receive(&sender, body) {
            Ok(next) => {
                *child = next;
                debug!(%address, "child record initialized");
                exit_codes::SUCCESS
            }
            Err(e) => {
                warn!(%address, %sender, error = %e, "child record rejected message");
                e.exit_code()
            }
        })
    }
}

#[async_trait]
impl LedgerAccess for InMemoryLedger {
    async fn deploy_child(
        &self,
        action: DeployAction,
        from: MsgAddress,
    ) -> Result<ChildDelivery, LedgerError> {
        let expected = action.state_init.address(action.destination.workchain)?;
        if expected != action.destination {
            return Err(LedgerError::AddressMismatch {
                destination: action.destination,
                expected,
            });
        }

        let created = {
            let mut children = self.children.write().await;
            if children.contains_key(&action.destination) {
                false
            } else {
                let child = ChildRecordState::from_data(&action.state_init.data)?;
                children.insert(action.destination, child);
                true
            }
        };

        let exit_code = self.deliver(action.destination, from, &action.body).await?;
        Ok(ChildDelivery {
            address: action.destination,
            created,
            exit_code,
        })
    }

    async fn child_data(&self, address: MsgAddress) -> Result<SourceItemData, LedgerError> {
        self.children
            .read()
            .await
            .get(&address)
            .map(ChildRecordState::view)
            .ok_or(LedgerError::ChildNotFound(address))
    }
}

// =============================================================================
// TESTS
// =============================================================================
