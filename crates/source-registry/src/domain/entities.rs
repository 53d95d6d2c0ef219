//! # Core Domain Entities
//!
//! Registry state, the registry account that owns it, and the actions a
//! processed message hands to the surrounding ledger.

use crate::domain::value_objects::{
    ArcCell, Cell, Coins, ContentKey, MsgAddress, VerifierKey,
};
use serde::{Deserialize, Serialize};
use shared_cells::{CellBuilder, CellError};
use std::sync::Arc;

// =============================================================================
// REGISTRY STATE
// =============================================================================

/// Persistent registry configuration.
///
/// Mutated only through `registry::apply`. `min_fee <= max_fee` is NOT
/// maintained: only `min_fee` is bounds-checked on update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryState {
    /// Address allowed to reconfigure the registry.
    pub admin: MsgAddress,
    /// Address allowed to request deployments.
    pub verifier_source: MsgAddress,
    /// Lowest value a deploy request may carry (inclusive).
    pub min_fee: Coins,
    /// Highest value a deploy request may carry (inclusive).
    pub max_fee: Coins,
    /// Code of every newly deployed child record.
    pub child_code: ArcCell,
}

impl RegistryState {
    /// Serializes the state as the registry's persistent data cell.
    ///
    /// Layout: `min_fee:Coins max_fee:Coins admin:MsgAddress
    /// verifier_source:MsgAddress ^child_code`.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_coins(self.min_fee)?
            .store_coins(self.max_fee)?
            .store_address(&self.admin)?
            .store_address(&self.verifier_source)?
            .store_ref(self.child_code.clone())?;
        b.build()
    }

    /// Restores the state from a persistent data cell.
    pub fn from_cell(cell: &Cell) -> Result<Self, CellError> {
        let mut s = cell.parse();
        let min_fee = s.load_coins()?;
        let max_fee = s.load_coins()?;
        let admin = s.load_address()?;
        let verifier_source = s.load_address()?;
        let child_code = s.load_ref()?;
        s.ensure_empty()?;
        Ok(Self {
            admin,
            verifier_source,
            min_fee,
            max_fee,
            child_code,
        })
    }
}

// =============================================================================
// STATE INIT
// =============================================================================

/// Initial program image of an account: code plus persistent data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateInit {
    /// Executable code.
    pub code: ArcCell,
    /// Initial persistent data.
    pub data: ArcCell,
}

impl StateInit {
    /// Creates an initial state.
    #[must_use]
    pub fn new(code: ArcCell, data: ArcCell) -> Self {
        Self { code, data }
    }

    /// Serializes as `split_depth:(Maybe) special:(Maybe) code:(Maybe ^Cell)
    /// data:(Maybe ^Cell) library:(HashmapE)`, i.e. bits `00110`.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_bit(false)?
            .store_bit(false)?
            .store_maybe_ref(Some(self.code.clone()))?
            .store_maybe_ref(Some(self.data.clone()))?
            .store_bit(false)?;
        b.build()
    }

    /// Address of the account this initial state creates.
    pub fn address(&self, workchain: i8) -> Result<MsgAddress, CellError> {
        Ok(MsgAddress::new(workchain, self.to_cell()?.repr_hash()))
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Instruction to create a child record and initialize it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployAction {
    /// Derived address of the child record.
    pub destination: MsgAddress,
    /// Child code and initial data.
    pub state_init: StateInit,
    /// Set-content message delivered right after creation.
    pub body: ArcCell,
    /// Value forwarded with the deployment.
    pub value: Coins,
}

/// Outgoing effect of a successfully applied message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutAction {
    /// Deploy a child record.
    Deploy(DeployAction),
    /// Replace the registry's own code from the next message on.
    SetCode(ArcCell),
}

/// Result of applying one message: the new state and at most one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State after the message.
    pub state: RegistryState,
    /// Outgoing action, if any.
    pub action: Option<OutAction>,
}

impl Transition {
    /// A transition that changes nothing.
    #[must_use]
    pub fn unchanged(state: &RegistryState) -> Self {
        Self {
            state: state.clone(),
            action: None,
        }
    }
}

// =============================================================================
// REGISTRY ACCOUNT
// =============================================================================

/// The deployed registry: its address, current code and state.
#[derive(Clone, Debug)]
pub struct RegistryAccount {
    /// Address derived from the registry's initial state.
    pub address: MsgAddress,
    /// Current executable code.
    pub code: ArcCell,
    /// Current configuration.
    pub state: RegistryState,
}

impl RegistryAccount {
    /// Creates the registry account at the address its initial state implies.
    pub fn deploy(workchain: i8, code: ArcCell, state: RegistryState) -> Result<Self, CellError> {
        let init = StateInit::new(code.clone(), Arc::new(state.to_cell()?));
        Ok(Self {
            address: init.address(workchain)?,
            code,
            state,
        })
    }

    /// Commits a transition. Returns the deploy action still to be executed.
    pub fn commit(&mut self, transition: Transition) -> Option<DeployAction> {
        self.state = transition.state;
        match transition.action {
            Some(OutAction::SetCode(code)) => {
                self.code = code;
                None
            }
            Some(OutAction::Deploy(action)) => Some(action),
            None => None,
        }
    }
}

// =============================================================================
// SOURCE ITEM VIEW
// =============================================================================

/// Read-only view of a child record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItemData {
    /// Digest of the submitter identity.
    pub verifier_key: VerifierKey,
    /// Raw content hash.
    pub content_key: ContentKey,
    /// Registry that created the record.
    pub registry: MsgAddress,
    /// Stored pointer, `None` until initialized.
    pub content_pointer: Option<Vec<u8>>,
}

impl SourceItemData {
    /// Content pointer as UTF-8 text, if set and valid.
    #[must_use]
    pub fn content_pointer_str(&self) -> Option<&str> {
        self.content_pointer
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

// =============================================================================
// TESTS
// =============================================================================
