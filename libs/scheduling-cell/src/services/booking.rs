// libs/scheduling-cell/src/services/booking.rs
use chrono::{Duration, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::models::{
    Appointment, AppointmentStatus, CancelAppointmentRequest, CancelledBy,
    CreateAppointmentRequest, PaymentStatus, SchedulingConfig, SchedulingError,
};
use crate::services::availability::{intervals_overlap, AvailabilityService};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::store::SchedulingStore;

pub struct BookingService {
    store: Arc<dyn SchedulingStore>,
    availability: AvailabilityService,
    lifecycle: AppointmentLifecycleService,
    config: SchedulingConfig,
    // One lock per staff member; bookings for different staff never contend.
    staff_locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl BookingService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self::with_config(store, SchedulingConfig::default())
    }

    pub fn with_config(store: Arc<dyn SchedulingStore>, config: SchedulingConfig) -> Self {
        let availability = AvailabilityService::new(Arc::clone(&store));

        Self {
            availability,
            lifecycle: AppointmentLifecycleService::new(),
            store,
            config,
            staff_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Book a service for a client at a date + time-of-day. Resolves a free
    /// qualified staff member, then persists the appointment with the
    /// service/staff/client fields snapshotted at booking time. The returned
    /// appointment carries the resolved staff assignment.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking service {} for client {} on {} at {}",
            request.service_id,
            request.client_id,
            request.date,
            request.time.format("%H:%M")
        );

        let service = self
            .store
            .get_service_by_id(request.service_id)
            .await?
            .ok_or(SchedulingError::ServiceNotFound)?;

        // Local wall-clock; end is derived from the service duration once,
        // at creation, and never independently mutated.
        let start_time = request.date.and_time(request.time);
        let end_time = start_time + Duration::minutes(service.duration_minutes);

        if start_time <= Local::now().naive_local() {
            return Err(SchedulingError::InvalidTime(
                "Appointment must be scheduled for a future time".to_string(),
            ));
        }

        let staff = self
            .availability
            .find_available_staff(&service.staff_ids, start_time, end_time, request.date)
            .await?
            .ok_or(SchedulingError::NoAvailability)?;

        // Serialize the write path per staff member and re-check conflicts
        // under the lock; two simultaneous bookings of the same staff/slot
        // otherwise race between the availability read and the insert.
        let lock = self.staff_lock(staff.id);
        let _guard = lock.lock().await;

        let existing = self
            .store
            .get_appointments_on(&[staff.id], request.date, &AppointmentStatus::BLOCKING)
            .await?;
        let taken = existing
            .iter()
            .any(|apt| intervals_overlap(apt.start_time, apt.end_time, start_time, end_time));
        if taken {
            warn!(
                "Slot {} - {} for staff {} was taken during booking",
                start_time, end_time, staff.id
            );
            return Err(SchedulingError::NoAvailability);
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            service_id: service.id,
            service_name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            price: service.price,
            staff_id: staff.id,
            staff_name: staff.name.clone(),
            client_id: request.client_id,
            client_name: request.client_name,
            start_time,
            end_time,
            status: AppointmentStatus::Confirmed,
            notes: request.notes,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let persisted = self.store.persist_appointment(&appointment).await?;

        info!(
            "Appointment {} confirmed with {}",
            persisted.id, persisted.staff_name
        );
        Ok(persisted)
    }

    /// Cancel an appointment. The state machine applies to every caller;
    /// the cancellation-notice window applies to client cancellations only.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        request: CancelAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Cancelling appointment: {}", appointment_id);

        let mut appointment = self.get_appointment(appointment_id).await?;

        self.lifecycle
            .validate_status_transition(&appointment.status, &AppointmentStatus::Cancelled)?;

        if request.cancelled_by == CancelledBy::Client {
            self.validate_client_cancellation(&appointment)?;
        }

        self.store
            .update_appointment_status(appointment_id, AppointmentStatus::Cancelled)
            .await?;

        appointment.status = AppointmentStatus::Cancelled;
        appointment.updated_at = Utc::now();

        info!(
            "Appointment {} cancelled by {:?}: {}",
            appointment_id,
            request.cancelled_by,
            request.reason.as_deref().unwrap_or("no reason given")
        );
        Ok(appointment)
    }

    /// Mark an appointment as completed (Confirmed -> Completed).
    pub async fn complete_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Completing appointment: {}", appointment_id);

        let mut appointment = self.get_appointment(appointment_id).await?;

        self.lifecycle
            .validate_status_transition(&appointment.status, &AppointmentStatus::Completed)?;

        self.store
            .update_appointment_status(appointment_id, AppointmentStatus::Completed)
            .await?;

        appointment.status = AppointmentStatus::Completed;
        appointment.updated_at = Utc::now();
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        self.store
            .get_appointment_by_id(appointment_id)
            .await?
            .ok_or(SchedulingError::AppointmentNotFound)
    }

    /// Every appointment on a date, for the day-view screens.
    pub async fn list_appointments_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.store.get_appointments_for_day(date).await
    }

    pub async fn list_staff_appointments_on(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.store.get_appointments_on(&[staff_id], date, &[]).await
    }

    fn validate_client_cancellation(
        &self,
        appointment: &Appointment,
    ) -> Result<(), SchedulingError> {
        if appointment.status != AppointmentStatus::Confirmed {
            return Err(SchedulingError::InvalidStatusTransition(appointment.status));
        }

        let now = Local::now().naive_local();
        let notice = Duration::hours(self.config.cancellation_notice_hours);

        if appointment.start_time <= now + notice {
            return Err(SchedulingError::CancellationWindow(format!(
                "Appointments can only be cancelled at least {} hours in advance",
                self.config.cancellation_notice_hours
            )));
        }

        Ok(())
    }

    fn staff_lock(&self, staff_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.staff_locks.lock().unwrap();
        locks.entry(staff_id).or_default().clone()
    }
}
