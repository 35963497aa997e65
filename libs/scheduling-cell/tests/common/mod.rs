// Shared fixtures for the scheduling-cell test suite: an in-memory
// SchedulingStore fake plus builders for services, staff, windows and
// appointments.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use uuid::Uuid;
use std::sync::{Arc, Mutex};

use scheduling_cell::models::{
    weekday_index, Appointment, AppointmentStatus, PaymentStatus, SchedulingConfig,
    SchedulingError, Service, StaffMember, WorkingWindow,
};
use scheduling_cell::services::SchedulingServices;
use scheduling_cell::store::SchedulingStore;

pub struct InMemoryStore {
    pub services: Vec<Service>,
    pub staff: Vec<StaffMember>,
    pub windows: Vec<WorkingWindow>,
    pub appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            staff: Vec::new(),
            windows: Vec::new(),
            appointments: Mutex::new(Vec::new()),
        }
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_staff(mut self, member: StaffMember) -> Self {
        self.staff.push(member);
        self
    }

    pub fn with_window(mut self, window: WorkingWindow) -> Self {
        self.windows.push(window);
        self
    }

    pub fn with_appointment(self, appointment: Appointment) -> Self {
        self.appointments.lock().unwrap().push(appointment);
        self
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.lock().unwrap().len()
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn get_service_by_id(&self, id: Uuid) -> Result<Option<Service>, SchedulingError> {
        Ok(self.services.iter().find(|s| s.id == id).cloned())
    }

    async fn get_qualified_staff(
        &self,
        staff_ids: &[Uuid],
    ) -> Result<Vec<StaffMember>, SchedulingError> {
        Ok(self
            .staff
            .iter()
            .filter(|s| s.active && staff_ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn get_working_windows(
        &self,
        staff_ids: &[Uuid],
        weekday: Weekday,
    ) -> Result<Vec<WorkingWindow>, SchedulingError> {
        let day = weekday_index(weekday);
        Ok(self
            .windows
            .iter()
            .filter(|w| w.active && w.day_of_week == day && staff_ids.contains(&w.staff_id))
            .cloned()
            .collect())
    }

    async fn get_appointments_on(
        &self,
        staff_ids: &[Uuid],
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                staff_ids.contains(&a.staff_id)
                    && a.start_time.date() == date
                    && (statuses.is_empty() || statuses.contains(&a.status))
            })
            .cloned()
            .collect())
    }

    async fn get_appointment_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Appointment>, SchedulingError> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn get_appointments_for_day(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.start_time.date() == date)
            .cloned()
            .collect())
    }

    async fn persist_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError> {
        self.appointments
            .lock()
            .unwrap()
            .push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        let mut appointments = self.appointments.lock().unwrap();
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(SchedulingError::AppointmentNotFound)?;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(())
    }
}

// ==============================================================================
// FIXTURE BUILDERS
// ==============================================================================

pub fn build_services(store: InMemoryStore) -> SchedulingServices {
    SchedulingServices::with_store(Arc::new(store), SchedulingConfig::default())
}

pub fn haircut(staff_ids: &[Uuid]) -> Service {
    service_with("Haircut", 30, 35.0, staff_ids)
}

pub fn service_with(name: &str, duration_minutes: i64, price: f64, staff_ids: &[Uuid]) -> Service {
    Service {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price,
        duration_minutes,
        staff_ids: staff_ids.to_vec(),
    }
}

pub fn stylist(name: &str) -> StaffMember {
    StaffMember {
        id: Uuid::new_v4(),
        name: name.to_string(),
        active: true,
    }
}

pub fn inactive_stylist(name: &str) -> StaffMember {
    StaffMember {
        active: false,
        ..stylist(name)
    }
}

/// A working window for the weekday of `date`.
pub fn window(staff_id: Uuid, date: NaiveDate, start: &str, end: &str) -> WorkingWindow {
    WorkingWindow {
        id: Uuid::new_v4(),
        staff_id,
        day_of_week: weekday_index(date.weekday()),
        start_time: t(start),
        end_time: t(end),
        active: true,
    }
}

/// An existing booking for `staff_id` covering `[start, end)` on `date`.
pub fn booked(
    staff_id: Uuid,
    date: NaiveDate,
    start: &str,
    end: &str,
    status: AppointmentStatus,
) -> Appointment {
    booked_at(staff_id, date.and_time(t(start)), date.and_time(t(end)), status)
}

pub fn booked_at(
    staff_id: Uuid,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        service_name: "Haircut".to_string(),
        duration_minutes: (end_time - start_time).num_minutes(),
        price: 35.0,
        staff_id,
        staff_name: "Test Stylist".to_string(),
        client_id: Uuid::new_v4(),
        client_name: "Test Client".to_string(),
        start_time,
        end_time,
        status,
        notes: None,
        payment_status: PaymentStatus::Pending,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn t(hhmm: &str) -> NaiveTime {
    NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap()
}

/// A fixed Monday, far enough out that slot fixtures stay stable.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 9, 2).unwrap()
}

/// The next Monday at least two days from now; booking validation rejects
/// past dates, so booking tests use a date relative to the clock.
pub fn upcoming_monday() -> NaiveDate {
    let mut date = Local::now().date_naive() + Duration::days(2);
    while date.weekday() != Weekday::Mon {
        date += Duration::days(1);
    }
    date
}
