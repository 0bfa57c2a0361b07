//! Appointment status vocabulary.
//!
//! Two independent axes: lifecycle status (scheduling state) and payment
//! status (billing state). A cancelled appointment may still carry any
//! payment status. Unrecognized or absent wire values fall back to
//! `Pending` — a display default, never a value the mutator writes on its
//! own.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Scheduling state of an appointment.
///
/// `Pending` is the parse fallback for values this client does not
/// recognize; the backend only ever writes scheduled/completed/cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Pending,
}

// Deserialized through `parse` so unrecognized wire values degrade to the
// display fallback instead of failing the whole payload.
impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(AppointmentStatus::parse(&raw))
    }
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Pending => "pending",
        }
    }

    /// Parse a wire value, falling back to `Pending` for anything unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "scheduled" => AppointmentStatus::Scheduled,
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Pending,
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pending
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing state of an appointment, independent of lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(PaymentStatus::parse(&raw))
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }

    /// Parse a wire value, falling back to `Pending` for anything unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "paid" => PaymentStatus::Paid,
            "overdue" => PaymentStatus::Overdue,
            _ => PaymentStatus::Pending,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status facet of the list view filter: everything, or one lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => StatusFilter::All,
            other => StatusFilter::Only(AppointmentStatus::parse(other)),
        }
    }

    pub fn matches(&self, status: AppointmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

/// Date facet of the list view filter, anchored on "today" in the
/// configured timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    /// Today through today + 7 days, inclusive.
    Week,
    /// Today through today + 1 calendar month, inclusive.
    Month,
    /// Strictly before the start of today.
    Past,
}

impl DateWindow {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "today" => DateWindow::Today,
            "week" => DateWindow::Week,
            "month" => DateWindow::Month,
            "past" => DateWindow::Past,
            _ => DateWindow::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_values() {
        assert_eq!(
            AppointmentStatus::parse("scheduled"),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            AppointmentStatus::parse("Completed"),
            AppointmentStatus::Completed
        );
        assert_eq!(
            AppointmentStatus::parse(" cancelled "),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn test_status_parse_unknown_falls_back_to_pending() {
        assert_eq!(AppointmentStatus::parse(""), AppointmentStatus::Pending);
        assert_eq!(
            AppointmentStatus::parse("rescheduled"),
            AppointmentStatus::Pending
        );
    }

    #[test]
    fn test_status_deserialize_unknown_variant() {
        let status: AppointmentStatus = serde_json::from_str("\"no-show\"").unwrap();
        assert_eq!(status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_status_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
    }

    #[test]
    fn test_payment_parse_and_fallback() {
        assert_eq!(PaymentStatus::parse("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::parse("overdue"), PaymentStatus::Overdue);
        assert_eq!(PaymentStatus::parse("pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::parse("refunded"), PaymentStatus::Pending);
    }

    #[test]
    fn test_payment_deserialize_unknown_variant() {
        let status: PaymentStatus = serde_json::from_str("\"voided\"").unwrap();
        assert_eq!(status, PaymentStatus::Pending);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("completed"),
            StatusFilter::Only(AppointmentStatus::Completed)
        );
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(AppointmentStatus::Cancelled));
        assert!(StatusFilter::Only(AppointmentStatus::Scheduled)
            .matches(AppointmentStatus::Scheduled));
        assert!(!StatusFilter::Only(AppointmentStatus::Scheduled)
            .matches(AppointmentStatus::Completed));
    }

    #[test]
    fn test_date_window_parse() {
        assert_eq!(DateWindow::parse("today"), DateWindow::Today);
        assert_eq!(DateWindow::parse("WEEK"), DateWindow::Week);
        assert_eq!(DateWindow::parse("anything"), DateWindow::All);
    }
}
