// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, patch},
};

use crate::handlers;
use crate::services::AppointmentAvailabilityService;

pub fn appointment_routes(service: Arc<AppointmentAvailabilityService>) -> Router {
    Router::new()
        // Booking and lifecycle
        .route("/", post(handlers::create_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/{appointment_id}/confirm", post(handlers::confirm_appointment))
        .route("/{appointment_id}/reschedule", patch(handlers::reschedule_appointment))

        // Listings
        .route("/patients/{patient_id}", get(handlers::get_patient_appointments))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor_appointments))

        // Availability
        .route("/available-doctors", get(handlers::get_available_doctors))
        .route("/doctors/{doctor_id}/available-slots", get(handlers::get_available_slots))
        .route("/doctors/{doctor_id}/slot-availability", get(handlers::check_slot_availability))

        .with_state(service)
}
