// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use chrono::NaiveDate;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AvailabilityQuery, CancelAppointmentRequest, CreateAppointmentRequest, SchedulingError,
    SlotQuery,
};
use crate::services::SchedulingServices;

// ==============================================================================
// SLOT AND AVAILABILITY HANDLERS
// ==============================================================================

/// List every bookable slot for a service on a date. An empty list is a
/// valid answer (fully booked or no working hours that day).
#[axum::debug_handler]
pub async fn get_slots(
    State(services): State<Arc<SchedulingServices>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = services
        .slots
        .generate_slots(query.service_id, query.date)
        .await
        .map_err(|e| match e {
            SchedulingError::ServiceNotFound => {
                AppError::NotFound("Service not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "date": query.date,
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn check_availability(
    State(services): State<Arc<SchedulingServices>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let check = services
        .availability
        .check_availability(query.service_id, query.date, query.time)
        .await
        .map_err(|e| match e {
            SchedulingError::ServiceNotFound => {
                AppError::NotFound("Service not found".to_string())
            }
            SchedulingError::NoQualifiedStaff => {
                AppError::ValidationError("Service has no assignable staff".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(check)))
}

// ==============================================================================
// APPOINTMENT BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(services): State<Arc<SchedulingServices>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = services
        .booking
        .create_appointment(request)
        .await
        .map_err(|e| match e {
            SchedulingError::ServiceNotFound => {
                AppError::NotFound("Service not found".to_string())
            }
            SchedulingError::NoQualifiedStaff => {
                AppError::ValidationError("Service has no assignable staff".to_string())
            }
            SchedulingError::NoAvailability => {
                AppError::Conflict("No staff member is free for the requested slot".to_string())
            }
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    let message = format!("Appointment confirmed with {}", appointment.staff_name);
    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(services): State<Arc<SchedulingServices>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = services
        .booking
        .get_appointment(appointment_id)
        .await
        .map_err(|e| match e {
            SchedulingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(services): State<Arc<SchedulingServices>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = services
        .booking
        .cancel_appointment(appointment_id, request)
        .await
        .map_err(|e| match e {
            SchedulingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            SchedulingError::InvalidStatusTransition(status) => {
                AppError::BadRequest(format!("Cannot cancel appointment in status: {}", status))
            }
            SchedulingError::CancellationWindow(msg) => AppError::BadRequest(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled successfully"
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(services): State<Arc<SchedulingServices>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = services
        .booking
        .complete_appointment(appointment_id)
        .await
        .map_err(|e| match e {
            SchedulingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            SchedulingError::InvalidStatusTransition(status) => {
                AppError::BadRequest(format!("Cannot complete appointment in status: {}", status))
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment marked as completed"
    })))
}

// ==============================================================================
// DAY VIEW HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_day_schedule(
    State(services): State<Arc<SchedulingServices>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, AppError> {
    let appointments = services
        .booking
        .list_appointments_on(date)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "date": date,
        "appointments": appointments,
        "total": appointments.len()
    })))
}
