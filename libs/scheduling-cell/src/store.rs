// libs/scheduling-cell/src/store.rs
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc, Weekday};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;
use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, SchedulingError, Service, StaffMember,
    WorkingWindow, weekday_index,
};

/// Data-access operations the scheduling core consumes from the surrounding
/// application. The production implementation talks to Supabase REST; tests
/// substitute an in-memory fake.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn get_service_by_id(&self, id: Uuid) -> Result<Option<Service>, SchedulingError>;

    /// Active staff members among the given ids. Order is not significant;
    /// callers that need a deterministic order impose their own.
    async fn get_qualified_staff(
        &self,
        staff_ids: &[Uuid],
    ) -> Result<Vec<StaffMember>, SchedulingError>;

    /// Active working windows for the given staff on a weekday.
    async fn get_working_windows(
        &self,
        staff_ids: &[Uuid],
        weekday: Weekday,
    ) -> Result<Vec<WorkingWindow>, SchedulingError>;

    /// Appointments for the given staff whose start falls on `date`.
    /// An empty `statuses` slice means no status filter.
    async fn get_appointments_on(
        &self,
        staff_ids: &[Uuid],
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, SchedulingError>;

    async fn get_appointment_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Appointment>, SchedulingError>;

    /// All appointments on `date` regardless of staff or status (day views).
    async fn get_appointments_for_day(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    async fn persist_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError>;

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), SchedulingError>;
}

pub struct SupabaseSchedulingStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseSchedulingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    fn id_list(ids: &[Uuid]) -> String {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn status_list(statuses: &[AppointmentStatus]) -> String {
        statuses
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn format_timestamp(ts: NaiveDateTime) -> String {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    async fn fetch_appointments(&self, path: &str) -> Result<Vec<Appointment>, SchedulingError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                SchedulingError::DatabaseError(format!("Failed to parse appointments: {}", e))
            })
    }
}

#[async_trait]
impl SchedulingStore for SupabaseSchedulingStore {
    async fn get_service_by_id(&self, id: Uuid) -> Result<Option<Service>, SchedulingError> {
        debug!("Fetching service: {}", id);

        let path = format!("/rest/v1/services?id=eq.{}", id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let service: Service = serde_json::from_value(row).map_err(|e| {
                    SchedulingError::DatabaseError(format!("Failed to parse service: {}", e))
                })?;
                Ok(Some(service))
            }
            None => Ok(None),
        }
    }

    async fn get_qualified_staff(
        &self,
        staff_ids: &[Uuid],
    ) -> Result<Vec<StaffMember>, SchedulingError> {
        if staff_ids.is_empty() {
            return Ok(vec![]);
        }

        let path = format!(
            "/rest/v1/staff?id=in.({})&active=eq.true&order=name.asc",
            Self::id_list(staff_ids)
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<StaffMember>, _>>()
            .map_err(|e| SchedulingError::DatabaseError(format!("Failed to parse staff: {}", e)))
    }

    async fn get_working_windows(
        &self,
        staff_ids: &[Uuid],
        weekday: Weekday,
    ) -> Result<Vec<WorkingWindow>, SchedulingError> {
        if staff_ids.is_empty() {
            return Ok(vec![]);
        }

        let path = format!(
            "/rest/v1/working_hours?staff_id=in.({})&day_of_week=eq.{}&active=eq.true&order=start_time.asc",
            Self::id_list(staff_ids),
            weekday_index(weekday)
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<WorkingWindow>, _>>()
            .map_err(|e| {
                SchedulingError::DatabaseError(format!("Failed to parse working hours: {}", e))
            })
    }

    async fn get_appointments_on(
        &self,
        staff_ids: &[Uuid],
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, SchedulingError> {
        if staff_ids.is_empty() {
            return Ok(vec![]);
        }

        let day_start = date.and_hms_opt(0, 0, 0).unwrap();
        let day_end = date.and_hms_opt(23, 59, 59).unwrap();

        let mut path = format!(
            "/rest/v1/appointments?staff_id=in.({})&start_time=gte.{}&start_time=lte.{}",
            Self::id_list(staff_ids),
            Self::format_timestamp(day_start),
            Self::format_timestamp(day_end),
        );
        if !statuses.is_empty() {
            path.push_str(&format!("&status=in.({})", Self::status_list(statuses)));
        }
        path.push_str("&order=start_time.asc");

        self.fetch_appointments(&path).await
    }

    async fn get_appointment_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Appointment>, SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let appointments = self.fetch_appointments(&path).await?;
        Ok(appointments.into_iter().next())
    }

    async fn get_appointments_for_day(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap();
        let day_end = date.and_hms_opt(23, 59, 59).unwrap();

        let path = format!(
            "/rest/v1/appointments?start_time=gte.{}&start_time=lte.{}&order=start_time.asc",
            Self::format_timestamp(day_start),
            Self::format_timestamp(day_end),
        );

        self.fetch_appointments(&path).await
    }

    async fn persist_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError> {
        let appointment_data = serde_json::to_value(appointment).map_err(|e| {
            SchedulingError::DatabaseError(format!("Failed to serialize appointment: {}", e))
        })?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(appointment_data),
                Some(headers),
            )
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            SchedulingError::DatabaseError("Failed to create appointment".to_string())
        })?;

        serde_json::from_value(row).map_err(|e| {
            SchedulingError::DatabaseError(format!("Failed to parse created appointment: {}", e))
        })
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let update_data = json!({
            "status": status.to_string(),
            "updated_at": Utc::now().to_rfc3339(),
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(update_data), Some(headers))
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::AppointmentNotFound);
        }

        Ok(())
    }
}
