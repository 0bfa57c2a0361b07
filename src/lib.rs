//! ClinicBoard core: appointment/payment status reconciliation.
//!
//! The clinic dashboard is mostly thin view glue over a remote API; the
//! part with a real engineering contract is how a status change travels
//! from a button press to the backend and back. This crate is that core:
//!
//! - [`status`] — the lifecycle/payment vocabulary and its
//!   default-on-missing policy.
//! - [`api`] — the transport seam (one generic request operation) and the
//!   read-side fetch helpers.
//! - [`mutator`] — the fallback chain that persists a status change
//!   against a backend whose write contract is not reliably known.
//! - [`reconcile`] — optimistic overlay + authoritative refetch, with an
//!   epoch guard against stale application.
//! - [`view_model`] — the pure filter/tally projection for the list view.
//! - [`services`] — the dashboard aggregator (concurrent fetches,
//!   per-source degradation) and the owned periodic refresh task.
//! - [`config`] — client configuration (`~/.clinicboard/config.json`).

pub mod api;
pub mod config;
pub mod mutator;
pub mod reconcile;
pub mod status;
pub mod types;
pub mod view_model;
pub mod services;
