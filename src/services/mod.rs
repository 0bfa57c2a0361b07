//! Dashboard-facing services: aggregation and periodic refresh.

pub mod dashboard;
pub mod poller;
