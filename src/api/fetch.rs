//! Read-side fetch helpers over the transport seam.
//!
//! Paths mirror the clinic backend: `/appointments`, `/users/doctors`,
//! `/users/patients`, `/dashboard/stats`.

use super::{ApiRequest, Transport, TransportError};
use crate::types::{Appointment, DashboardStats, User};

/// Fetch the authoritative appointment collection for the current user.
/// The backend scopes the list by the caller's role server-side.
pub async fn fetch_appointments(
    transport: &dyn Transport,
) -> Result<Vec<Appointment>, TransportError> {
    let value = transport.send(ApiRequest::get("/appointments")).await?;
    Ok(serde_json::from_value(value)?)
}

/// Fetch the doctors collection (name resolution source).
pub async fn fetch_doctors(transport: &dyn Transport) -> Result<Vec<User>, TransportError> {
    let value = transport.send(ApiRequest::get("/users/doctors")).await?;
    Ok(serde_json::from_value(value)?)
}

/// Fetch the patients collection (name resolution source).
pub async fn fetch_patients(transport: &dyn Transport) -> Result<Vec<User>, TransportError> {
    let value = transport.send(ApiRequest::get("/users/patients")).await?;
    Ok(serde_json::from_value(value)?)
}

/// Fetch role-shaped summary counters.
pub async fn fetch_stats(transport: &dyn Transport) -> Result<DashboardStats, TransportError> {
    let value = transport.send(ApiRequest::get("/dashboard/stats")).await?;
    Ok(serde_json::from_value(value)?)
}
