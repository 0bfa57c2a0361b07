//! Dashboard aggregation service.
//!
//! One refresh cycle combines four independently sourced fetches (summary
//! stats, doctors, patients, appointments) into a single ready/loading
//! state. Failure is isolated per source: a dead stats endpoint degrades
//! the stats section to zeros without blocking the appointment list. Only
//! when every source fails in the same cycle does the aggregate report an
//! error.
//!
//! The appointment collection is owned by the optimistic reconciler; on a
//! failed appointments fetch the last-known list (and any pending local
//! overlay) is kept rather than degraded to empty, because an empty list
//! would masquerade as an authoritative truth the server never asserted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::api::{fetch, Transport};
use crate::mutator::{self, MutationError, MutationOutcome};
use crate::reconcile::{AppointmentSet, StatusPatch};
use crate::status::{AppointmentStatus, PaymentStatus};
use crate::types::{Appointment, DashboardStats, NameIndex, Role, User, ViewFilter};
use crate::view_model;

/// Aggregate readiness flag for the current refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Loading,
    Ready,
    /// Every constituent source failed in the same cycle.
    Error(String),
}

/// Point-in-time copy of everything the view renders.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub phase: RefreshPhase,
    pub stats: DashboardStats,
    pub doctors: Vec<User>,
    pub patients: Vec<User>,
    /// Merged appointment collection (authoritative + pending overlay).
    pub appointments: Vec<Appointment>,
    /// Sources that degraded to defaults during the last cycle.
    pub degraded_sources: Vec<&'static str>,
    pub last_refresh_at: Option<DateTime<Utc>>,
}

struct Inner {
    appointments: AppointmentSet,
    doctors: Vec<User>,
    patients: Vec<User>,
    names: NameIndex,
    stats: DashboardStats,
    phase: RefreshPhase,
    degraded: Vec<&'static str>,
    last_refresh_at: Option<DateTime<Utc>>,
}

/// Shared dashboard state for one mounted view.
///
/// The authoritative collection is owned exclusively by this state for
/// its lifetime; there is no cross-view shared cache. Call
/// [`teardown`](DashboardState::teardown) when the view unmounts so
/// in-flight fetch results are dropped instead of applied.
pub struct DashboardState {
    inner: RwLock<Inner>,
    timezone: Tz,
}

impl DashboardState {
    pub fn new(timezone: Tz) -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(Inner {
                appointments: AppointmentSet::new(),
                doctors: Vec::new(),
                patients: Vec::new(),
                names: NameIndex::default(),
                stats: DashboardStats::default(),
                phase: RefreshPhase::Idle,
                degraded: Vec::new(),
                last_refresh_at: None,
            }),
            timezone,
        })
    }

    /// Run one full refresh cycle: fire all four fetches concurrently,
    /// join, apply. A cycle interrupted by [`teardown`](Self::teardown)
    /// applies nothing.
    pub async fn refresh(&self, transport: &dyn Transport) {
        let refresh_id = Uuid::new_v4();
        let epoch = {
            let mut inner = self.inner.write();
            inner.phase = RefreshPhase::Loading;
            inner.appointments.epoch()
        };
        log::debug!("dashboard refresh {} started", refresh_id);

        let (stats, doctors, patients, appointments) = tokio::join!(
            fetch::fetch_stats(transport),
            fetch::fetch_doctors(transport),
            fetch::fetch_patients(transport),
            fetch::fetch_appointments(transport),
        );

        let mut degraded: Vec<&'static str> = Vec::new();
        let stats = stats.unwrap_or_else(|e| {
            log::warn!("dashboard refresh {}: stats degraded: {}", refresh_id, e);
            degraded.push("stats");
            DashboardStats::default()
        });
        let doctors = doctors.unwrap_or_else(|e| {
            log::warn!("dashboard refresh {}: doctors degraded: {}", refresh_id, e);
            degraded.push("doctors");
            Vec::new()
        });
        let patients = patients.unwrap_or_else(|e| {
            log::warn!("dashboard refresh {}: patients degraded: {}", refresh_id, e);
            degraded.push("patients");
            Vec::new()
        });

        let mut inner = self.inner.write();
        if inner.appointments.epoch() != epoch {
            // View torn down (or remounted) while the fetches were in
            // flight. Drop the whole cycle, including the sections that
            // fetched fine.
            log::debug!("dashboard refresh {} dropped: stale epoch", refresh_id);
            return;
        }
        match appointments {
            Ok(fresh) => {
                // Epoch verified above, so this always applies.
                inner.appointments.reconcile(epoch, fresh);
            }
            Err(e) => {
                log::warn!(
                    "dashboard refresh {}: appointments fetch failed, keeping last-known: {}",
                    refresh_id,
                    e
                );
                degraded.push("appointments");
            }
        }

        inner.names = NameIndex::from_users([doctors.as_slice(), patients.as_slice()]);
        inner.stats = stats;
        inner.doctors = doctors;
        inner.patients = patients;
        inner.phase = if degraded.len() == 4 {
            RefreshPhase::Error("all dashboard sources failed".to_string())
        } else {
            RefreshPhase::Ready
        };
        inner.degraded = degraded;
        inner.last_refresh_at = Some(Utc::now());
        log::debug!(
            "dashboard refresh {} applied ({} appointments, {} degraded sources)",
            refresh_id,
            inner.appointments.len(),
            inner.degraded.len()
        );
    }

    /// Change an appointment's lifecycle status: optimistic overlay first,
    /// then the remote fallback chain, then a reconciling refetch. An
    /// exhausted chain rolls the overlay back and surfaces the error.
    pub async fn set_status(
        &self,
        transport: &dyn Transport,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> Result<MutationOutcome, MutationError> {
        if appointment_id.trim().is_empty() {
            return Err(MutationError::EmptyId);
        }

        self.inner
            .write()
            .appointments
            .apply_local_status(appointment_id, StatusPatch::Lifecycle(status));

        match mutator::set_status(transport, appointment_id, status).await {
            Ok(outcome) => {
                self.refresh(transport).await;
                Ok(outcome)
            }
            Err(e) => {
                self.inner
                    .write()
                    .appointments
                    .clear_local_patch(appointment_id, StatusPatch::Lifecycle(status));
                self.refresh(transport).await;
                Err(e)
            }
        }
    }

    /// Change an appointment's payment status. Never surfaces chain
    /// exhaustion: the caller receives [`MutationOutcome::Simulated`] and
    /// must label the acknowledgment as unconfirmed.
    pub async fn set_payment_status(
        &self,
        transport: &dyn Transport,
        appointment_id: &str,
        status: PaymentStatus,
    ) -> Result<MutationOutcome, MutationError> {
        if appointment_id.trim().is_empty() {
            return Err(MutationError::EmptyId);
        }

        self.inner
            .write()
            .appointments
            .apply_local_status(appointment_id, StatusPatch::Payment(status));

        let outcome = mutator::set_payment_status(transport, appointment_id, status).await?;
        self.refresh(transport).await;
        Ok(outcome)
    }

    /// The filtered, merged appointment list for a given "today".
    pub fn visible_on(
        &self,
        filter: &ViewFilter,
        today: chrono::NaiveDate,
    ) -> Vec<Appointment> {
        let inner = self.inner.read();
        let merged = inner.appointments.merged();
        view_model::visible(&merged, filter, &inner.names, self.timezone, today)
    }

    /// The filtered, merged appointment list anchored on the current
    /// calendar day in the configured timezone.
    pub fn visible(&self, filter: &ViewFilter) -> Vec<Appointment> {
        let today = Utc::now().with_timezone(&self.timezone).date_naive();
        self.visible_on(filter, today)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let inner = self.inner.read();
        DashboardSnapshot {
            phase: inner.phase.clone(),
            stats: inner.stats.clone(),
            doctors: inner.doctors.clone(),
            patients: inner.patients.clone(),
            appointments: inner.appointments.merged(),
            degraded_sources: inner.degraded.clone(),
            last_refresh_at: inner.last_refresh_at,
        }
    }

    pub fn phase(&self) -> RefreshPhase {
        self.inner.read().phase.clone()
    }

    /// Invalidate in-flight fetches when the owning view unmounts. Their
    /// results will be dropped instead of applied.
    pub fn teardown(&self) {
        let mut inner = self.inner.write();
        inner.appointments.invalidate();
        inner.phase = RefreshPhase::Idle;
    }
}

/// Payment-status controls are exposed to admins only.
pub fn can_edit_payment_status(role: Role) -> bool {
    role == Role::Admin
}

/// Lifecycle-status controls are exposed to doctors and admins.
pub fn can_edit_status(role: Role) -> bool {
    matches!(role, Role::Doctor | Role::Admin)
}
