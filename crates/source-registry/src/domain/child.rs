//! # Child Record Logic
//!
//! A child record is created `Empty` and becomes `Initialized` on the first
//! set-content message from its registry. `Initialized` is terminal: further
//! set-content messages fail with `AlreadyInitialized` and the stored pointer
//! stays as it was.

use crate::codec::parse_child_body;
use crate::domain::entities::SourceItemData;
use crate::domain::value_objects::{
    ArcCell, Cell, ContentKey, MsgAddress, SourceKey, VerifierKey,
};
use crate::errors::ChildError;
use shared_cells::{decode_snake, CellBuilder, CellError};

/// Lifecycle phase of a child record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChildPhase {
    /// Created, no content pointer yet.
    Empty,
    /// Content pointer stored.
    Initialized {
        /// Snake-encoded pointer as received.
        content: ArcCell,
        /// Decoded pointer bytes.
        pointer: Vec<u8>,
    },
}

/// Persistent state of one child record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildRecordState {
    /// Key the record's address was derived from.
    pub key: SourceKey,
    /// Creating registry, the only sender allowed to initialize.
    pub registry: MsgAddress,
    /// Lifecycle phase.
    pub phase: ChildPhase,
}

impl ChildRecordState {
    /// A fresh, empty record.
    #[must_use]
    pub fn new(key: SourceKey, registry: MsgAddress) -> Self {
        Self {
            key,
            registry,
            phase: ChildPhase::Empty,
        }
    }

    /// Restores a record from its persistent data cell.
    pub fn from_data(data: &Cell) -> Result<Self, CellError> {
        let mut s = data.parse();
        let verifier = VerifierKey::new(s.load_array::<32>()?);
        let content_key = ContentKey::new(s.load_array::<32>()?);
        let registry = s.load_address()?;
        let content = s.load_maybe_ref()?;
        s.ensure_empty()?;

        let phase = match content {
            None => ChildPhase::Empty,
            Some(content) => {
                let pointer = decode_snake(&content)?;
                ChildPhase::Initialized { content, pointer }
            }
        };
        Ok(Self {
            key: SourceKey::new(verifier, content_key),
            registry,
            phase,
        })
    }

    /// Encodes the record as its persistent data cell.
    pub fn to_data_cell(&self) -> Result<Cell, CellError> {
        let content = match &self.phase {
            ChildPhase::Empty => None,
            ChildPhase::Initialized { content, .. } => Some(content.clone()),
        };
        let mut b = CellBuilder::new();
        b.store_bytes(self.key.verifier.as_bytes())?
            .store_bytes(self.key.content.as_bytes())?
            .store_address(&self.registry)?
            .store_maybe_ref(content)?;
        b.build()
    }

    /// Returns true once the content pointer is set.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.phase, ChildPhase::Initialized { .. })
    }

    /// Handles a set-content message, returning the next state.
    ///
    /// The sender is checked before the phase.
    pub fn receive(&self, sender: &MsgAddress, body: &Cell) -> Result<Self, ChildError> {
        if *sender != self.registry {
            return Err(ChildError::Unauthorized { sender: *sender });
        }
        if self.is_initialized() {
            return Err(ChildError::AlreadyInitialized);
        }
        let content = parse_child_body(body)?;
        let pointer = decode_snake(&content)?;
        Ok(Self {
            key: self.key,
            registry: self.registry,
            phase: ChildPhase::Initialized { content, pointer },
        })
    }

    /// Read-only view: keys, registry and pointer (if any).
    #[must_use]
    pub fn view(&self) -> SourceItemData {
        SourceItemData {
            verifier_key: self.key.verifier,
            content_key: self.key.content,
            registry: self.registry,
            content_pointer: match &self.phase {
                ChildPhase::Empty => None,
                ChildPhase::Initialized { pointer, .. } => Some(pointer.clone()),
            },
        }
    }
}
