use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentAvailabilityService;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::DoctorDirectory;
use patient_cell::router::patient_routes;
use patient_cell::services::PatientDirectory;

/// Backends shared by every cell router.
pub struct ApiServices {
    pub appointments: Arc<AppointmentAvailabilityService>,
    pub patients: Arc<dyn PatientDirectory>,
    pub doctors: Arc<dyn DoctorDirectory>,
}

pub fn create_router(services: ApiServices) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital booking API is running!" }))
        .nest("/appointments", appointment_routes(services.appointments))
        .nest("/doctors", doctor_routes(services.doctors))
        .nest("/patients", patient_routes(services.patients))
}
