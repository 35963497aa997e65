// libs/scheduling-cell/src/services/slots.rs
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;
use std::sync::Arc;

use crate::models::{AppointmentStatus, SchedulingConfig, SchedulingError, Slot};
use crate::services::availability::intervals_overlap;
use crate::store::SchedulingStore;

pub struct SlotGenerationService {
    store: Arc<dyn SchedulingStore>,
    config: SchedulingConfig,
}

impl SlotGenerationService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self::with_config(store, SchedulingConfig::default())
    }

    pub fn with_config(store: Arc<dyn SchedulingStore>, config: SchedulingConfig) -> Self {
        Self { store, config }
    }

    /// Enumerate every bookable slot for a service on a date, across all
    /// qualified staff. Recomputed fully on each call; nothing is cached.
    /// A given time-of-day appears once per staff member able to serve it.
    /// An empty result is a valid answer, not an error.
    pub async fn generate_slots(
        &self,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, SchedulingError> {
        let service = self
            .store
            .get_service_by_id(service_id)
            .await?
            .ok_or(SchedulingError::ServiceNotFound)?;

        debug!(
            "Generating slots for service {} ({} min) on {}",
            service.id, service.duration_minutes, date
        );

        let windows = self
            .store
            .get_working_windows(&service.staff_ids, date.weekday())
            .await?;
        let appointments = self
            .store
            .get_appointments_on(&service.staff_ids, date, &AppointmentStatus::BLOCKING)
            .await?;

        let stride = Duration::minutes(self.config.slot_stride_minutes);
        let duration = Duration::minutes(service.duration_minutes);

        let mut slots = Vec::new();

        for window in &windows {
            let mut cursor = window.start_time;
            loop {
                // overflowing_add_signed reports a wrap past midnight, which
                // always ends the window.
                let (slot_end, wrapped) = cursor.overflowing_add_signed(duration);
                if wrapped != 0 || slot_end > window.end_time {
                    break;
                }

                let start_at = date.and_time(cursor);
                let end_at = date.and_time(slot_end);

                let conflict = appointments.iter().any(|apt| {
                    apt.staff_id == window.staff_id
                        && intervals_overlap(apt.start_time, apt.end_time, start_at, end_at)
                });

                if !conflict {
                    slots.push(Slot {
                        time_of_day: cursor,
                        staff_id: window.staff_id,
                        available: true,
                    });
                }

                let (next, wrapped) = cursor.overflowing_add_signed(stride);
                if wrapped != 0 {
                    break;
                }
                cursor = next;
            }
        }

        slots.sort_by(|a, b| a.time_of_day.cmp(&b.time_of_day));

        debug!("Found {} bookable slots", slots.len());
        Ok(slots)
    }
}
