use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use scheduling_cell::router::scheduling_routes;
use scheduling_cell::SchedulingServices;

pub fn create_router(state: Arc<SchedulingServices>) -> Router {
    Router::new()
        .route("/", get(|| async { "Salon booking API is running!" }))
        .nest("/appointments", scheduling_routes(state))
}
