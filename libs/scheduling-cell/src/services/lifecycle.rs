// libs/scheduling-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentStatus, SchedulingError};

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed. Invalid transitions
    /// reject with no mutation.
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!(
            "Validating status transition {} -> {}",
            current_status, new_status
        );

        let valid_transitions = self.get_valid_transitions(current_status);

        if !valid_transitions.contains(new_status) {
            warn!(
                "Invalid status transition attempted: {} -> {}",
                current_status, new_status
            );
            return Err(SchedulingError::InvalidStatusTransition(*current_status));
        }

        Ok(())
    }

    /// All valid next statuses for a given current status.
    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            // Pending exists as a status value but the booking flow never
            // produces it; appointments enter directly at Confirmed.
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn confirmed_can_complete_or_cancel() {
        let lifecycle = AppointmentLifecycleService::new();

        assert!(lifecycle
            .validate_status_transition(&AppointmentStatus::Confirmed, &AppointmentStatus::Completed)
            .is_ok());
        assert!(lifecycle
            .validate_status_transition(&AppointmentStatus::Confirmed, &AppointmentStatus::Cancelled)
            .is_ok());
    }

    #[test]
    fn terminal_states_allow_nothing() {
        let lifecycle = AppointmentLifecycleService::new();

        for terminal in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
            assert!(lifecycle.get_valid_transitions(&terminal).is_empty());
            assert_matches!(
                lifecycle.validate_status_transition(&terminal, &AppointmentStatus::Confirmed),
                Err(SchedulingError::InvalidStatusTransition(_))
            );
        }
    }

    #[test]
    fn pending_cannot_jump_to_completed() {
        let lifecycle = AppointmentLifecycleService::new();

        assert_matches!(
            lifecycle.validate_status_transition(&AppointmentStatus::Pending, &AppointmentStatus::Completed),
            Err(SchedulingError::InvalidStatusTransition(AppointmentStatus::Pending))
        );
    }
}
