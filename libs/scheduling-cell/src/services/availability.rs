// libs/scheduling-cell/src/services/availability.rs
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;
use std::sync::Arc;

use crate::models::{
    AppointmentStatus, AvailabilityCheck, SchedulingError, StaffMember, WorkingWindow,
};
use crate::store::SchedulingStore;

pub struct AvailabilityService {
    store: Arc<dyn SchedulingStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Find the first qualified staff member free for `[start, end)` on
    /// `date`. Candidates are tried in the declared order of the service's
    /// staff list and the first match wins; callers needing load balancing
    /// pre-sort the candidate ids. Pure read + selection, no side effects.
    pub async fn find_available_staff(
        &self,
        service_staff_ids: &[Uuid],
        start: NaiveDateTime,
        end: NaiveDateTime,
        date: NaiveDate,
    ) -> Result<Option<StaffMember>, SchedulingError> {
        debug!(
            "Resolving availability for {} candidates, {} - {}",
            service_staff_ids.len(),
            start,
            end
        );

        let staff = self.store.get_qualified_staff(service_staff_ids).await?;
        if staff.is_empty() {
            return Err(SchedulingError::NoQualifiedStaff);
        }

        let windows = self
            .store
            .get_working_windows(service_staff_ids, date.weekday())
            .await?;
        let appointments = self
            .store
            .get_appointments_on(service_staff_ids, date, &AppointmentStatus::BLOCKING)
            .await?;

        for staff_id in service_staff_ids {
            let Some(member) = staff.iter().find(|s| s.id == *staff_id) else {
                continue;
            };

            let fits_window = windows
                .iter()
                .filter(|w| w.staff_id == member.id)
                .any(|w| window_contains(w, start, end));
            if !fits_window {
                continue;
            }

            let conflict = appointments.iter().any(|apt| {
                apt.staff_id == member.id
                    && intervals_overlap(apt.start_time, apt.end_time, start, end)
            });
            if conflict {
                continue;
            }

            debug!("Staff {} is free for {} - {}", member.id, start, end);
            return Ok(Some(member.clone()));
        }

        debug!("No staff free for {} - {}", start, end);
        Ok(None)
    }

    /// Resolve a service and check whether the slot at `date` + `time` can be
    /// served by anyone qualified for it.
    pub async fn check_availability(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time: chrono::NaiveTime,
    ) -> Result<AvailabilityCheck, SchedulingError> {
        let service = self
            .store
            .get_service_by_id(service_id)
            .await?
            .ok_or(SchedulingError::ServiceNotFound)?;

        let start = date.and_time(time);
        let end = start + Duration::minutes(service.duration_minutes);

        let staff = self
            .find_available_staff(&service.staff_ids, start, end, date)
            .await?;

        Ok(AvailabilityCheck {
            available: staff.is_some(),
            staff,
        })
    }
}

/// Half-open interval overlap: [a, b) and [c, d) conflict iff a < d && c < b.
/// Back-to-back intervals do not conflict.
pub(crate) fn intervals_overlap(
    start1: NaiveDateTime,
    end1: NaiveDateTime,
    start2: NaiveDateTime,
    end2: NaiveDateTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// A window accepts the interval when it fully contains it. An interval
/// running past midnight fits no window.
fn window_contains(window: &WorkingWindow, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start.date() == end.date()
        && start.time() >= window.start_time
        && end.time() <= window.end_time
}
