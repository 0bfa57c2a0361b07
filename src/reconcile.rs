//! Optimistic update + reconciliation for the appointment collection.
//!
//! Two explicit slices: the last-known-authoritative list and a pending
//! local overlay of per-appointment status replacements. Reads merge the
//! two; a successful refetch replaces the authoritative slice and clears
//! the overlay — reconciliation always wins, even when that visibly
//! reverts an optimistic value the server never accepted.
//!
//! An epoch counter guards against stale application: a refetch started
//! before the owning view was torn down (or the set was otherwise
//! invalidated) is dropped instead of applied.

use std::collections::HashMap;

use crate::status::{AppointmentStatus, PaymentStatus};
use crate::types::Appointment;

/// Which status axis a local overlay entry replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Status,
    PaymentStatus,
}

/// A typed local replacement for one appointment's status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPatch {
    Lifecycle(AppointmentStatus),
    Payment(PaymentStatus),
}

impl StatusPatch {
    fn field(&self) -> StatusField {
        match self {
            StatusPatch::Lifecycle(_) => StatusField::Status,
            StatusPatch::Payment(_) => StatusField::PaymentStatus,
        }
    }
}

/// Identifies one generation of the authoritative collection. Captured
/// when a fetch starts; checked when its result comes back.
///
/// A successful [`reconcile`](AppointmentSet::reconcile) also starts a new
/// generation, so of two overlapping refetches the first to complete wins
/// and the loser is dropped wholesale. The losing cycle's data is at most
/// one poll interval stale and the next cycle picks it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch(u64);

#[derive(Debug, Clone, Default)]
struct Overlay {
    status: Option<AppointmentStatus>,
    payment_status: Option<PaymentStatus>,
}

impl Overlay {
    fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none()
    }
}

/// The visible appointment collection: authoritative list plus pending
/// local overlay.
#[derive(Debug, Default)]
pub struct AppointmentSet {
    authoritative: Vec<Appointment>,
    overlay: HashMap<String, Overlay>,
    epoch: u64,
}

impl AppointmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the authoritative slice directly (initial load, tests).
    pub fn with_authoritative(appointments: Vec<Appointment>) -> Self {
        Self {
            authoritative: appointments,
            overlay: HashMap::new(),
            epoch: 0,
        }
    }

    /// The current generation. Capture before starting a fetch whose
    /// result will be offered to [`reconcile`](Self::reconcile).
    pub fn epoch(&self) -> Epoch {
        Epoch(self.epoch)
    }

    /// Invalidate all in-flight fetches, e.g. when the owning view is
    /// torn down. Their results will be dropped on arrival.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }

    /// Record a local status replacement for one appointment. The
    /// authoritative slice is never mutated; reads see the merged result
    /// immediately, before any remote attempt settles.
    pub fn apply_local_status(&mut self, appointment_id: &str, patch: StatusPatch) {
        let entry = self.overlay.entry(appointment_id.to_string()).or_default();
        match patch {
            StatusPatch::Lifecycle(status) => entry.status = Some(status),
            StatusPatch::Payment(status) => entry.payment_status = Some(status),
        }
    }

    /// Drop a pending local replacement (lifecycle mutation failed and
    /// was surfaced; the optimistic value must not survive).
    pub fn clear_local_status(&mut self, appointment_id: &str, field: StatusField) {
        if let Some(entry) = self.overlay.get_mut(appointment_id) {
            match field {
                StatusField::Status => entry.status = None,
                StatusField::PaymentStatus => entry.payment_status = None,
            }
            if entry.is_empty() {
                self.overlay.remove(appointment_id);
            }
        }
    }

    /// Roll back one patch exactly (used when a surfaced failure must not
    /// leave the optimistic value behind).
    pub fn clear_local_patch(&mut self, appointment_id: &str, patch: StatusPatch) {
        self.clear_local_status(appointment_id, patch.field());
    }

    /// Replace the authoritative slice with a freshly fetched list and
    /// clear every overlay entry — the refetch is the last writer.
    ///
    /// Returns false (and applies nothing) if `started_at` is no longer
    /// the current epoch: the set was invalidated while the fetch was in
    /// flight.
    pub fn reconcile(&mut self, started_at: Epoch, fresh: Vec<Appointment>) -> bool {
        if started_at != self.epoch() {
            log::debug!(
                "reconcile: dropping stale refetch (epoch {} != {})",
                started_at.0,
                self.epoch
            );
            return false;
        }
        self.authoritative = fresh;
        self.overlay.clear();
        self.epoch += 1;
        true
    }

    /// The merged view: authoritative order, overlay fields substituted.
    /// Untouched appointments are returned unchanged.
    pub fn merged(&self) -> Vec<Appointment> {
        self.authoritative
            .iter()
            .map(|appointment| match self.overlay.get(&appointment.id) {
                None => appointment.clone(),
                Some(patch) => {
                    let mut merged = appointment.clone();
                    if let Some(status) = patch.status {
                        merged.status = status;
                    }
                    if let Some(payment_status) = patch.payment_status {
                        merged.payment_status = payment_status;
                    }
                    merged
                }
            })
            .collect()
    }

    /// Number of appointments in the authoritative slice.
    pub fn len(&self) -> usize {
        self.authoritative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authoritative.is_empty()
    }

    /// True if any optimistic replacement is still pending reconciliation.
    pub fn has_pending_overlay(&self) -> bool {
        !self.overlay.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn appointment(id: &str, status: AppointmentStatus, payment: PaymentStatus) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            doctor_id: "d1".to_string(),
            appointment_date: Utc.with_ymd_and_hms(2026, 8, 25, 10, 0, 0).unwrap(),
            duration_minutes: 30,
            notes: Some("checkup".to_string()),
            status,
            payment_status: payment,
            consultation_fee: 50.0,
            created_at: None,
        }
    }

    #[test]
    fn test_apply_local_status_changes_only_target_field() {
        let set = AppointmentSet::with_authoritative(vec![
            appointment("a1", AppointmentStatus::Scheduled, PaymentStatus::Pending),
            appointment("a2", AppointmentStatus::Completed, PaymentStatus::Overdue),
        ]);
        let before = set.merged();

        let mut set = set;
        set.apply_local_status("a1", StatusPatch::Payment(PaymentStatus::Paid));
        let after = set.merged();

        assert_eq!(after[0].payment_status, PaymentStatus::Paid);
        // Every other field of a1 is untouched
        assert_eq!(after[0].status, before[0].status);
        assert_eq!(after[0].notes, before[0].notes);
        assert_eq!(after[0].appointment_date, before[0].appointment_date);
        // a2 is byte-identical
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn test_overlay_does_not_mutate_authoritative() {
        let mut set = AppointmentSet::with_authoritative(vec![appointment(
            "a1",
            AppointmentStatus::Scheduled,
            PaymentStatus::Pending,
        )]);
        set.apply_local_status("a1", StatusPatch::Lifecycle(AppointmentStatus::Cancelled));

        assert_eq!(set.authoritative[0].status, AppointmentStatus::Scheduled);
        assert_eq!(set.merged()[0].status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_reconcile_always_wins() {
        let mut set = AppointmentSet::with_authoritative(vec![appointment(
            "a1",
            AppointmentStatus::Scheduled,
            PaymentStatus::Pending,
        )]);
        set.apply_local_status("a1", StatusPatch::Payment(PaymentStatus::Paid));
        assert!(set.has_pending_overlay());

        // Server never saw the write: fresh list still says pending.
        let epoch = set.epoch();
        let applied = set.reconcile(
            epoch,
            vec![appointment(
                "a1",
                AppointmentStatus::Scheduled,
                PaymentStatus::Pending,
            )],
        );

        assert!(applied);
        assert!(!set.has_pending_overlay());
        // The optimistic value visibly reverts — accepted inconsistency.
        assert_eq!(set.merged()[0].payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_stale_reconcile_is_dropped() {
        let mut set = AppointmentSet::with_authoritative(vec![appointment(
            "a1",
            AppointmentStatus::Scheduled,
            PaymentStatus::Pending,
        )]);
        let epoch = set.epoch();
        set.invalidate();

        let applied = set.reconcile(epoch, Vec::new());
        assert!(!applied);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_overlapping_refetches_first_completer_wins() {
        let mut set = AppointmentSet::new();
        // Two refetches start under the same generation.
        let epoch = set.epoch();

        let applied = set.reconcile(
            epoch,
            vec![appointment(
                "a1",
                AppointmentStatus::Scheduled,
                PaymentStatus::Pending,
            )],
        );
        assert!(applied);

        // The slower cycle loses and is dropped wholesale.
        let applied = set.reconcile(epoch, Vec::new());
        assert!(!applied);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_clear_local_patch_rolls_back_one_axis() {
        let mut set = AppointmentSet::with_authoritative(vec![appointment(
            "a1",
            AppointmentStatus::Scheduled,
            PaymentStatus::Pending,
        )]);
        set.apply_local_status("a1", StatusPatch::Lifecycle(AppointmentStatus::Completed));
        set.apply_local_status("a1", StatusPatch::Payment(PaymentStatus::Paid));

        set.clear_local_patch("a1", StatusPatch::Lifecycle(AppointmentStatus::Completed));

        let merged = set.merged();
        assert_eq!(merged[0].status, AppointmentStatus::Scheduled);
        assert_eq!(merged[0].payment_status, PaymentStatus::Paid);
        assert!(set.has_pending_overlay());

        set.clear_local_patch("a1", StatusPatch::Payment(PaymentStatus::Paid));
        assert!(!set.has_pending_overlay());
    }

    #[test]
    fn test_merged_preserves_insertion_order() {
        let mut set = AppointmentSet::with_authoritative(vec![
            appointment("z9", AppointmentStatus::Scheduled, PaymentStatus::Pending),
            appointment("a1", AppointmentStatus::Completed, PaymentStatus::Paid),
            appointment("m5", AppointmentStatus::Cancelled, PaymentStatus::Overdue),
        ]);
        set.apply_local_status("m5", StatusPatch::Payment(PaymentStatus::Paid));

        let merged = set.merged();
        let ids: Vec<&str> = merged.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["z9", "a1", "m5"]);
    }
}
