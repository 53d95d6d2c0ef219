//! # Registry State Machine
//!
//! `apply` is the single entry point: it validates one decoded operation
//! against the current state and the message context and returns the next
//! state plus at most one outgoing action. A rejection returns an error and
//! the caller keeps the old state, so no partial mutation is observable.

use crate::codec::{child_set_content_body, RegistryMessage, RegistryOperation};
use crate::domain::entities::{DeployAction, OutAction, RegistryState, Transition};
use crate::domain::invariants::{
    check_code_not_empty, check_fee_window, check_min_fee_floor, check_sender,
};
use crate::domain::services::child_state_init;
use crate::domain::value_objects::{Cell, MessageContext};
use crate::errors::RegistryError;
use std::sync::Arc;

/// Applies one operation.
pub fn apply(
    state: &RegistryState,
    ctx: &MessageContext,
    message: &RegistryMessage,
) -> Result<Transition, RegistryError> {
    match &message.operation {
        RegistryOperation::DeploySource { key, content } => {
            check_sender(&state.verifier_source, &ctx.sender)?;
            check_fee_window(ctx.value, state.min_fee, state.max_fee)?;

            let state_init = child_state_init(key, &ctx.receiver, &state.child_code)?;
            let destination = state_init.address(ctx.receiver.workchain)?;
            let body = Arc::new(child_set_content_body(content.clone())?);
            Ok(Transition {
                state: state.clone(),
                action: Some(OutAction::Deploy(DeployAction {
                    destination,
                    state_init,
                    body,
                    value: ctx.value,
                })),
            })
        }
        RegistryOperation::ChangeVerifierSource(address) => {
            check_sender(&state.admin, &ctx.sender)?;
            let mut next = state.clone();
            next.verifier_source = *address;
            Ok(Transition {
                state: next,
                action: None,
            })
        }
        RegistryOperation::ChangeAdmin(address) => {
            check_sender(&state.admin, &ctx.sender)?;
            let mut next = state.clone();
            next.admin = *address;
            Ok(Transition {
                state: next,
                action: None,
            })
        }
        RegistryOperation::SetChildCode(code) => {
            check_sender(&state.admin, &ctx.sender)?;
            check_code_not_empty(code)?;
            let mut next = state.clone();
            next.child_code = code.clone();
            Ok(Transition {
                state: next,
                action: None,
            })
        }
        RegistryOperation::ReplaceRegistryCode(code) => {
            check_sender(&state.admin, &ctx.sender)?;
            check_code_not_empty(code)?;
            Ok(Transition {
                state: state.clone(),
                action: Some(OutAction::SetCode(code.clone())),
            })
        }
        RegistryOperation::SetFeeBounds { min, max } => {
            check_sender(&state.admin, &ctx.sender)?;
            check_min_fee_floor(*min)?;
            let mut next = state.clone();
            next.min_fee = *min;
            next.max_fee = *max;
            Ok(Transition {
                state: next,
                action: None,
            })
        }
    }
}

/// Outcome of an inbound message that was not rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Processed {
    /// Decoded frame, `None` for bounces.
    pub message: Option<RegistryMessage>,
    /// Resulting transition.
    pub transition: Transition,
}

impl Processed {
    /// Query id of the frame, if one was decoded.
    #[must_use]
    pub fn query_id(&self) -> Option<u64> {
        self.message.as_ref().map(|m| m.query_id)
    }
}

/// Decodes and applies a raw inbound body.
///
/// Bounced messages are accepted and change nothing.
pub fn handle_inbound(
    state: &RegistryState,
    ctx: &MessageContext,
    body: &Cell,
) -> Result<Processed, RegistryError> {
    if ctx.bounced {
        return Ok(Processed {
            message: None,
            transition: Transition::unchanged(state),
        });
    }
    let message = RegistryMessage::from_cell(body)?;
    let transition = apply(state, ctx, &message)?;
    Ok(Processed {
        message: Some(message),
        transition,
    })
}

// =============================================================================
// TESTS
// =============================================================================
