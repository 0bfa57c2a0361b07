//! Remote status mutator.
//!
//! The backend's write contract for status changes is not reliably known:
//! depending on deployment, the partial-update route, the full-resource
//! route, or neither may exist. Each mutation is therefore an ordered
//! chain of candidate request shapes, tried strictly in sequence and
//! short-circuiting on the first success.
//!
//! Exhaustion semantics differ by axis:
//! - payment status: an exhausted chain degrades to
//!   [`MutationOutcome::Simulated`] so the caller can keep a local-only
//!   update and label it as unconfirmed. Never an error.
//! - lifecycle status: an exhausted chain is surfaced as
//!   [`MutationError::Exhausted`]; no local change survives.
//!
//! The mutator does not re-validate current state: re-setting a value an
//! appointment already has is accepted idempotently.

use reqwest::Method;

use crate::api::{ApiRequest, Transport};
use crate::status::{AppointmentStatus, PaymentStatus};

/// Non-throwing result of a settled mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Some step in the chain was accepted by the backend.
    Persisted,
    /// Every remote shape failed; the change exists only locally and must
    /// be labeled as unconfirmed in any user-visible acknowledgment.
    Simulated,
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("Appointment id is empty")]
    EmptyId,
    #[error("Status update failed: all {attempts} request shapes rejected")]
    Exhausted { attempts: usize },
}

/// Candidate request shapes for a lifecycle-status change, in priority
/// order: query-parameter update first, then body-carried full update.
fn lifecycle_chain(appointment_id: &str, status: AppointmentStatus) -> Vec<ApiRequest> {
    vec![
        ApiRequest::new(Method::PUT, format!("/appointments/{}", appointment_id))
            .param("status", status.as_str()),
        ApiRequest::new(Method::PUT, format!("/appointments/{}", appointment_id))
            .json(serde_json::json!({ "status": status.as_str() })),
    ]
}

/// Candidate request shapes for a payment-status change, in priority
/// order: dedicated partial-update route, full-resource update with body,
/// partial-update with body.
fn payment_chain(appointment_id: &str, status: PaymentStatus) -> Vec<ApiRequest> {
    vec![
        ApiRequest::new(
            Method::PATCH,
            format!("/appointments/{}/payment-status", appointment_id),
        )
        .param("payment_status", status.as_str()),
        ApiRequest::new(Method::PUT, format!("/appointments/{}", appointment_id))
            .json(serde_json::json!({ "payment_status": status.as_str() })),
        ApiRequest::new(Method::PATCH, format!("/appointments/{}", appointment_id))
            .json(serde_json::json!({ "payment_status": status.as_str() })),
    ]
}

/// Try each candidate in order. Returns true on the first success; a
/// success at step k is final and later steps are never attempted.
async fn run_chain(transport: &dyn Transport, label: &str, chain: Vec<ApiRequest>) -> bool {
    let total = chain.len();
    for (index, request) in chain.into_iter().enumerate() {
        let step = index + 1;
        let method = request.method.clone();
        let path = request.path.clone();
        match transport.send(request).await {
            Ok(_) => {
                log::debug!("{}: step {}/{} {} {} accepted", label, step, total, method, path);
                return true;
            }
            Err(e) => {
                log::warn!(
                    "{}: step {}/{} {} {} failed: {}",
                    label,
                    step,
                    total,
                    method,
                    path,
                    e
                );
            }
        }
    }
    false
}

/// Record a lifecycle-status change. Exhaustion is surfaced to the caller.
pub async fn set_status(
    transport: &dyn Transport,
    appointment_id: &str,
    status: AppointmentStatus,
) -> Result<MutationOutcome, MutationError> {
    if appointment_id.trim().is_empty() {
        return Err(MutationError::EmptyId);
    }

    let chain = lifecycle_chain(appointment_id, status);
    let attempts = chain.len();
    if run_chain(transport, "set_status", chain).await {
        Ok(MutationOutcome::Persisted)
    } else {
        Err(MutationError::Exhausted { attempts })
    }
}

/// Record a payment-status change. Exhaustion degrades to a simulated
/// success instead of an error.
pub async fn set_payment_status(
    transport: &dyn Transport,
    appointment_id: &str,
    status: PaymentStatus,
) -> Result<MutationOutcome, MutationError> {
    if appointment_id.trim().is_empty() {
        return Err(MutationError::EmptyId);
    }

    let chain = payment_chain(appointment_id, status);
    if run_chain(transport, "set_payment_status", chain).await {
        Ok(MutationOutcome::Persisted)
    } else {
        log::info!(
            "set_payment_status: no remote write path for {}; keeping local-only update",
            appointment_id
        );
        Ok(MutationOutcome::Simulated)
    }
}
