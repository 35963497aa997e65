// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::SchedulingServices;

pub fn scheduling_routes(state: Arc<SchedulingServices>) -> Router {
    Router::new()
        // Slot discovery and availability checks
        .route("/slots", get(handlers::get_slots))
        .route("/availability/check", get(handlers::check_availability))
        // Appointment lifecycle
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        // Day views
        .route("/day/{date}", get(handlers::get_day_schedule))
        .with_state(state)
}
