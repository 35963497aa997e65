// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::fmt;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// A bookable salon service. Read-only input to scheduling; `staff_ids` is
/// the declared list of staff qualified to perform it, and its order is the
/// tie-break order used when resolving availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
    pub staff_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
}

/// One declared working range for a staff member on a weekday.
/// Several windows per staff/day are allowed (e.g. morning + afternoon).
/// `day_of_week` uses 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub service_id: Uuid,
    // Service fields are snapshotted at booking time so historical
    // appointments stay stable if the service is later renamed or repriced.
    pub service_name: String,
    pub duration_minutes: i64,
    pub price: f64,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub client_id: Uuid,
    pub client_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses that occupy a staff member's time. Cancelled and completed
    /// appointments never block a slot.
    pub const BLOCKING: [AppointmentStatus; 2] =
        [AppointmentStatus::Confirmed, AppointmentStatus::Pending];
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// A candidate bookable time on a given date. Derived on every query,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    #[serde(with = "time_of_day")]
    pub time_of_day: NaiveTime,
    pub staff_id: Uuid,
    pub available: bool,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
    pub cancelled_by: CancelledBy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Client,
    Staff,
    Admin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub service_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityCheck {
    pub available: bool,
    pub staff: Option<StaffMember>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SchedulingError {
    #[error("Service not found")]
    ServiceNotFound,

    #[error("Service has no assignable staff")]
    NoQualifiedStaff,

    #[error("No staff member is free for the requested slot")]
    NoAvailability,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Cancellation window closed: {0}")]
    CancellationWindow(String),

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

// ==============================================================================
// CONFIGURATION
// ==============================================================================

#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Granularity of generated slot starts. Deliberately independent of
    /// service duration; duration only participates in the window-fit check.
    pub slot_stride_minutes: i64,
    /// Minimum notice a client must give to cancel a confirmed appointment.
    pub cancellation_notice_hours: i64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slot_stride_minutes: 15,
            cancellation_notice_hours: 24,
        }
    }
}

// ==============================================================================
// TIME HELPERS
// ==============================================================================

/// Map a weekday to the 0 = Sunday .. 6 = Saturday index used by the
/// working-hours rows.
pub fn weekday_index(weekday: Weekday) -> i32 {
    match weekday {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Serde codec for the canonical zero-padded "HH:MM" time-of-day encoding
/// used at the API boundary.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
