//! # Message Codec
//!
//! Binary frames for the registry's operations and the child's set-content
//! message.
//!
//! Every registry frame starts with `op:32 query_id:64`.
//!
//! | Op | Name | Fields |
//! |----|------|--------|
//! | 1002 | DeploySource | `verifier_key:256 content_key:256 ^content` |
//! | 2003 | ChangeVerifierSource | `address:MsgAddress` |
//! | 3004 | ChangeAdmin | `address:MsgAddress` |
//! | 4005 | SetChildCode | `^code` |
//! | 5006 | ReplaceRegistryCode | `^code` |
//! | 6007 | SetFeeBounds | `min:Coins max:Coins` |
//!
//! Decoding fails closed: truncated input, trailing bits or refs, and
//! out-of-range amounts are all `MalformedMessage`.

use crate::domain::services::derive_source_key;
use crate::domain::value_objects::{
    ArcCell, Cell, Coins, ContentKey, MsgAddress, SourceKey, VerifierKey,
};
use crate::errors::RegistryError;
use shared_cells::{
    decode_snake, deserialize_boc, encode_snake, serialize_boc, CellBuilder, CellError, CellSlice,
};
use std::sync::Arc;

/// Operation tags.
pub mod opcodes {
    /// Deploy a child record.
    pub const DEPLOY_SOURCE: u32 = 1002;
    /// Replace the verifier source.
    pub const CHANGE_VERIFIER_SOURCE: u32 = 2003;
    /// Replace the admin.
    pub const CHANGE_ADMIN: u32 = 3004;
    /// Replace the child code template.
    pub const SET_CHILD_CODE: u32 = 4005;
    /// Replace the registry's own code.
    pub const REPLACE_REGISTRY_CODE: u32 = 5006;
    /// Replace both fee bounds.
    pub const SET_FEE_BOUNDS: u32 = 6007;
}

// =============================================================================
// REGISTRY MESSAGES
// =============================================================================

/// A decoded registry operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryOperation {
    /// Deploy the child record for `key` and hand it `content`.
    DeploySource {
        /// Key of the new record.
        key: SourceKey,
        /// Snake-encoded content pointer.
        content: ArcCell,
    },
    /// Replace the verifier source.
    ChangeVerifierSource(MsgAddress),
    /// Replace the admin.
    ChangeAdmin(MsgAddress),
    /// Replace the child code template.
    SetChildCode(ArcCell),
    /// Replace the registry's own code.
    ReplaceRegistryCode(ArcCell),
    /// Replace both fee bounds.
    SetFeeBounds {
        /// New minimum fee.
        min: Coins,
        /// New maximum fee.
        max: Coins,
    },
}

impl RegistryOperation {
    /// Tag of this operation.
    #[must_use]
    pub fn opcode(&self) -> u32 {
        match self {
            Self::DeploySource { .. } => opcodes::DEPLOY_SOURCE,
            Self::ChangeVerifierSource(_) => opcodes::CHANGE_VERIFIER_SOURCE,
            Self::ChangeAdmin(_) => opcodes::CHANGE_ADMIN,
            Self::SetChildCode(_) => opcodes::SET_CHILD_CODE,
            Self::ReplaceRegistryCode(_) => opcodes::REPLACE_REGISTRY_CODE,
            Self::SetFeeBounds { .. } => opcodes::SET_FEE_BOUNDS,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeploySource { .. } => "deploy_source",
            Self::ChangeVerifierSource(_) => "change_verifier_source",
            Self::ChangeAdmin(_) => "change_admin",
            Self::SetChildCode(_) => "set_child_code",
            Self::ReplaceRegistryCode(_) => "replace_registry_code",
            Self::SetFeeBounds { .. } => "set_fee_bounds",
        }
    }
}

/// A full registry frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryMessage {
    /// Caller-chosen identifier, echoed in the receipt.
    pub query_id: u64,
    /// The operation.
    pub operation: RegistryOperation,
}

impl RegistryMessage {
    /// Creates a frame.
    #[must_use]
    pub fn new(query_id: u64, operation: RegistryOperation) -> Self {
        Self {
            query_id,
            operation,
        }
    }

    /// Builds a deploy frame from textual key inputs and a content pointer.
    pub fn deploy_source(
        query_id: u64,
        submitter_identity: &str,
        content_hash: &str,
        content_pointer: &[u8],
    ) -> Result<Self, RegistryError> {
        let key = derive_source_key(submitter_identity, content_hash)?;
        let content = encode_snake(content_pointer)?;
        Ok(Self::new(
            query_id,
            RegistryOperation::DeploySource { key, content },
        ))
    }

    /// Encodes the frame as a cell.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_u32(self.operation.opcode())?
            .store_u64(self.query_id)?;
        match &self.operation {
            RegistryOperation::DeploySource { key, content } => {
                b.store_bytes(key.verifier.as_bytes())?
                    .store_bytes(key.content.as_bytes())?
                    .store_ref(content.clone())?;
            }
            RegistryOperation::ChangeVerifierSource(address)
            | RegistryOperation::ChangeAdmin(address) => {
                b.store_address(address)?;
            }
            RegistryOperation::SetChildCode(code)
            | RegistryOperation::ReplaceRegistryCode(code) => {
                b.store_ref(code.clone())?;
            }
            RegistryOperation::SetFeeBounds { min, max } => {
                b.store_coins(*min)?.store_coins(*max)?;
            }
        }
        b.build()
    }

    /// Decodes a frame.
    ///
    /// An unknown tag fails with `UnknownOperation` before anything else
    /// is read.
    pub fn from_cell(cell: &Cell) -> Result<Self, RegistryError> {
        let mut s = cell.parse();
        let op = s.load_u32()?;
        if !is_known(op) {
            return Err(RegistryError::UnknownOperation(op));
        }
        let query_id = s.load_u64()?;
        let operation = match op {
            opcodes::DEPLOY_SOURCE => {
                let verifier = VerifierKey::new(s.load_array::<32>()?);
                let content_key = ContentKey::new(s.load_array::<32>()?);
                let content = s.load_ref()?;
                decode_snake(&content)?;
                RegistryOperation::DeploySource {
                    key: SourceKey::new(verifier, content_key),
                    content,
                }
            }
            opcodes::CHANGE_VERIFIER_SOURCE => {
                RegistryOperation::ChangeVerifierSource(s.load_address()?)
            }
            opcodes::CHANGE_ADMIN => RegistryOperation::ChangeAdmin(s.load_address()?),
            opcodes::SET_CHILD_CODE => RegistryOperation::SetChildCode(s.load_ref()?),
            opcodes::REPLACE_REGISTRY_CODE => {
                RegistryOperation::ReplaceRegistryCode(s.load_ref()?)
            }
            _ => RegistryOperation::SetFeeBounds {
                min: s.load_coins()?,
                max: s.load_coins()?,
            },
        };
        s.ensure_empty()?;
        Ok(Self::new(query_id, operation))
    }

    /// Encodes the frame as bag-of-cells bytes.
    pub fn to_boc(&self) -> Result<Vec<u8>, CellError> {
        Ok(serialize_boc(&Arc::new(self.to_cell()?)))
    }

    /// Decodes a frame from bag-of-cells bytes.
    pub fn from_boc(bytes: &[u8]) -> Result<Self, RegistryError> {
        let root = deserialize_boc(bytes)?;
        Self::from_cell(&root)
    }
}

fn is_known(op: u32) -> bool {
    matches!(
        op,
        opcodes::DEPLOY_SOURCE
            | opcodes::CHANGE_VERIFIER_SOURCE
            | opcodes::CHANGE_ADMIN
            | opcodes::SET_CHILD_CODE
            | opcodes::REPLACE_REGISTRY_CODE
            | opcodes::SET_FEE_BOUNDS
    )
}

/// Reads the query id of a frame whose header is intact, even if the rest
/// of it is not.
#[must_use]
pub fn peek_query_id(cell: &Cell) -> Option<u64> {
    let mut s = cell.parse();
    s.load_u32().ok().filter(|op| is_known(*op))?;
    s.load_u64().ok()
}

// =============================================================================
// CHILD MESSAGES
// =============================================================================

/// Body of the set-content message: no bits, one ref holding the content.
pub fn child_set_content_body(content: ArcCell) -> Result<Cell, CellError> {
    let mut b = CellBuilder::new();
    b.store_ref(content)?;
    b.build()
}

/// Extracts the content cell from a set-content body.
pub fn parse_child_body(body: &Cell) -> Result<ArcCell, CellError> {
    let mut s: CellSlice<'_> = body.parse();
    let content = s.load_ref()?;
    s.ensure_empty()?;
    Ok(content)
}

// =============================================================================
// TESTS
// =============================================================================
