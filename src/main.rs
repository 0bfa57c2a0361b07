//! One-shot dashboard refresh against the configured backend.
//!
//! Loads `~/.clinicboard/config.json`, runs a single refresh cycle, and
//! prints the aggregate result. Useful for verifying a deployment's
//! endpoints without the UI.

use std::process::ExitCode;
use std::sync::Arc;

use clinicboard::api::{HttpTransport, Transport};
use clinicboard::config;
use clinicboard::services::dashboard::{DashboardState, RefreshPhase};
use clinicboard::types::ViewFilter;
use clinicboard::view_model;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let transport = match HttpTransport::new(&config.api_base_url, &config.api_token) {
        Ok(t) => Arc::new(t) as Arc<dyn Transport>,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = DashboardState::new(config.resolved_timezone());
    state.refresh(transport.as_ref()).await;

    let snapshot = state.snapshot();
    match &snapshot.phase {
        RefreshPhase::Ready => {}
        RefreshPhase::Error(message) => {
            eprintln!("refresh failed: {}", message);
            return ExitCode::FAILURE;
        }
        other => {
            eprintln!("refresh did not settle: {:?}", other);
            return ExitCode::FAILURE;
        }
    }

    println!(
        "appointments: {}  doctors: {}  patients: {}",
        snapshot.appointments.len(),
        snapshot.doctors.len(),
        snapshot.patients.len()
    );
    if !snapshot.degraded_sources.is_empty() {
        println!("degraded sources: {}", snapshot.degraded_sources.join(", "));
    }

    let tally = view_model::status_tally(&state.visible(&ViewFilter::default()));
    let mut entries: Vec<String> = tally
        .iter()
        .map(|(status, count)| format!("{}={}", status, count))
        .collect();
    entries.sort();
    println!("status tally: {}", entries.join(" "));

    ExitCode::SUCCESS
}
