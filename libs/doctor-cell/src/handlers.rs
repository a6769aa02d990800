use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::DoctorListQuery;
use crate::services::DoctorDirectory;

#[axum::debug_handler]
pub async fn list_doctors(
    State(directory): State<Arc<dyn DoctorDirectory>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctors = directory.list(query.department_id).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<Arc<dyn DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.get_by_id(doctor_id, true).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor
    })))
}
