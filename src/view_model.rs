//! Appointment list view-model.
//!
//! A pure projection from (authoritative collection × filter state) to
//! the sequence the user sees. No hidden sort: output preserves the
//! insertion order of the input. Date windows are anchored on "today" in
//! the caller's timezone, so the same instant can fall on different
//! calendar days depending on configuration.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use chrono_tz::Tz;

use crate::status::{AppointmentStatus, DateWindow};
use crate::types::{Appointment, NameIndex, ViewFilter};

/// Apply search, status, and date-window filters. All three predicates
/// must hold. The result is a stable subsequence of the input.
pub fn visible(
    appointments: &[Appointment],
    filter: &ViewFilter,
    names: &NameIndex,
    tz: Tz,
    today: NaiveDate,
) -> Vec<Appointment> {
    let needle = filter.search.trim().to_lowercase();

    appointments
        .iter()
        .filter(|appointment| {
            matches_search(appointment, &needle, names)
                && filter.status.matches(appointment.status)
                && matches_window(appointment, filter.window, tz, today)
        })
        .cloned()
        .collect()
}

/// Per-status tallies over an already-filtered sequence. Statuses with no
/// occurrences are absent from the map.
pub fn status_tally(appointments: &[Appointment]) -> HashMap<AppointmentStatus, usize> {
    let mut tally = HashMap::new();
    for appointment in appointments {
        *tally.entry(appointment.status).or_insert(0) += 1;
    }
    tally
}

fn matches_search(appointment: &Appointment, needle: &str, names: &NameIndex) -> bool {
    if needle.is_empty() {
        return true;
    }

    let doctor = names.resolve(&appointment.doctor_id).unwrap_or_default();
    if doctor.to_lowercase().contains(needle) {
        return true;
    }
    let patient = names.resolve(&appointment.patient_id).unwrap_or_default();
    if patient.to_lowercase().contains(needle) {
        return true;
    }
    appointment
        .notes
        .as_deref()
        .map(|notes| notes.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn matches_window(appointment: &Appointment, window: DateWindow, tz: Tz, today: NaiveDate) -> bool {
    if window == DateWindow::All {
        return true;
    }

    let local_date = appointment.appointment_date.with_timezone(&tz).date_naive();
    match window {
        DateWindow::All => true,
        DateWindow::Today => local_date == today,
        DateWindow::Week => local_date >= today && local_date <= today + chrono::Days::new(7),
        DateWindow::Month => {
            // Inclusive through the same day next month, clamped at
            // month end (Aug 31 + 1 month = Sep 30).
            let end = today
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX);
            local_date >= today && local_date <= end
        }
        DateWindow::Past => local_date < today,
    }
}
