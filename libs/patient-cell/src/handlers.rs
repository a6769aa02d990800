use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::services::PatientDirectory;

#[axum::debug_handler]
pub async fn get_patient(
    State(directory): State<Arc<dyn PatientDirectory>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient = directory.get_by_id(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "patient": patient
    })))
}
