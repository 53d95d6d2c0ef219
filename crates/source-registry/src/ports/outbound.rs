//! # Driven Port (SPI - Outbound)
//!
//! The registry never creates child records itself. It hands each deploy
//! action to the ledger, which instantiates the child and delivers the
//! forwarded body.

use crate::domain::entities::{DeployAction, SourceItemData};
use crate::domain::value_objects::MsgAddress;
use crate::errors::LedgerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What happened when a deploy action reached the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildDelivery {
    /// Address the body was delivered to.
    pub address: MsgAddress,
    /// A new child record was created.
    pub created: bool,
    /// Exit code the child reported for the forwarded body.
    pub exit_code: u32,
}

/// Interface to the ledger holding child records.
#[async_trait]
pub trait LedgerAccess: Send + Sync {
    /// Executes a deploy action sent by `from`.
    ///
    /// Creates the child if its address is free, then delivers the body.
    /// A child rejecting the body is reported through
    /// `ChildDelivery::exit_code`, not as an error.
    async fn deploy_child(
        &self,
        action: DeployAction,
        from: MsgAddress,
    ) -> Result<ChildDelivery, LedgerError>;

    /// Read-only view of the child at `address`.
    async fn child_data(&self, address: MsgAddress) -> Result<SourceItemData, LedgerError>;
}
