use std::sync::Arc;
use axum::{routing::get, Router};

use crate::handlers::*;
use crate::services::PatientDirectory;

pub fn patient_routes(directory: Arc<dyn PatientDirectory>) -> Router {
    Router::new()
        .route("/{patient_id}", get(get_patient))
        .with_state(directory)
}
