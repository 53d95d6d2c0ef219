//! # Domain Services
//!
//! Pure derivation functions: submitter identity and content hash to key,
//! key to child initial state, initial state to address.
//!
//! The canonical layout used here is fixed. Changing any of it moves every
//! child record to a new address.

use crate::domain::entities::StateInit;
use crate::domain::value_objects::{ArcCell, Cell, ContentKey, MsgAddress, SourceKey, VerifierKey};
use crate::errors::RegistryError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use shared_cells::{CellBuilder, CellError};
use std::sync::Arc;

// =============================================================================
// KEY DERIVATION
// =============================================================================

/// SHA-256 over the UTF-8 bytes of the submitter identity.
#[must_use]
pub fn derive_verifier_key(submitter_identity: &str) -> VerifierKey {
    let digest = Sha256::digest(submitter_identity.as_bytes());
    VerifierKey::new(digest.into())
}

/// Decodes a standard-base64 content hash into its raw 32 bytes.
///
/// Anything that is not valid base64 of exactly 32 bytes fails with
/// `InvalidEncoding`.
pub fn decode_content_key(content_hash: &str) -> Result<ContentKey, RegistryError> {
    let bytes = STANDARD
        .decode(content_hash)
        .map_err(|e| RegistryError::InvalidEncoding(e.to_string()))?;
    let raw: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        RegistryError::InvalidEncoding(format!("content hash is {} bytes, expected 32", bytes.len()))
    })?;
    Ok(ContentKey::new(raw))
}

/// Derives both key halves from their textual inputs.
pub fn derive_source_key(
    submitter_identity: &str,
    content_hash: &str,
) -> Result<SourceKey, RegistryError> {
    Ok(SourceKey::new(
        derive_verifier_key(submitter_identity),
        decode_content_key(content_hash)?,
    ))
}

// =============================================================================
// ADDRESS DERIVATION
// =============================================================================

/// Child initial data: `verifier:256 content:256 registry:MsgAddress
/// content:(Maybe ^Cell)` with the maybe bit cleared.
pub fn child_initial_data(key: &SourceKey, registry: &MsgAddress) -> Result<Cell, CellError> {
    let mut b = CellBuilder::new();
    b.store_bytes(key.verifier.as_bytes())?
        .store_bytes(key.content.as_bytes())?
        .store_address(registry)?
        .store_maybe_ref(None)?;
    b.build()
}

/// Full initial program image of the child record for `key`.
pub fn child_state_init(
    key: &SourceKey,
    registry: &MsgAddress,
    child_code: &ArcCell,
) -> Result<StateInit, CellError> {
    let data = child_initial_data(key, registry)?;
    Ok(StateInit::new(child_code.clone(), Arc::new(data)))
}

/// Address at which the child record for `key` lives.
///
/// The child shares the registry's workchain.
pub fn derive_child_address(
    key: &SourceKey,
    registry: &MsgAddress,
    child_code: &ArcCell,
) -> Result<MsgAddress, CellError> {
    child_state_init(key, registry, child_code)?.address(registry.workchain)
}
