use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{AppointmentStatus, DateWindow, PaymentStatus, StatusFilter};

/// An appointment as served by the clinic API.
///
/// Wire format is snake_case JSON. `status` and `payment_status` tolerate
/// absent or unrecognized values by degrading to `pending`, so one bad
/// record never fails the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub appointment_date: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub consultation_fee: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_duration_minutes() -> u32 {
    30
}

/// Current user's role, gating which mutation affordances are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

/// A user record from the doctors or patients collections. Used only for
/// name resolution in search and display, never for authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub specialization: Option<String>,
}

/// Role-shaped counters from `GET /dashboard/stats`.
///
/// The backend returns a different subset of keys per role; every field
/// defaults to zero so any role's payload deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_appointments: u64,
    #[serde(default)]
    pub upcoming_appointments: u64,
    #[serde(default)]
    pub today_appointments: u64,
    #[serde(default)]
    pub total_prescriptions: u64,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub total_patients: u64,
    #[serde(default)]
    pub total_doctors: u64,
    #[serde(default)]
    pub total_users: u64,
}

/// Ephemeral list-view filter state. Owned by the view, recomputed per
/// render, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub search: String,
    pub status: StatusFilter,
    pub window: DateWindow,
}

/// User id → display name, built from the independently fetched doctors
/// and patients collections.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: HashMap<String, String>,
}

impl NameIndex {
    pub fn from_users<'a>(collections: impl IntoIterator<Item = &'a [User]>) -> Self {
        let mut names = HashMap::new();
        for users in collections {
            for user in users {
                if !user.full_name.is_empty() {
                    names.insert(user.id.clone(), user.full_name.clone());
                }
            }
        }
        Self { names }
    }

    pub fn resolve(&self, user_id: &str) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
