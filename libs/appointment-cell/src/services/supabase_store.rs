use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{api_error, SupabaseClient};

use crate::models::{Appointment, AppointmentError};
use crate::services::store::{
    AppointmentFilter, AppointmentPatch, AppointmentStore, FindOptions, NewAppointment,
};

const TABLE_PATH: &str = "/rest/v1/appointments";

/// Appointment store backed by the PostgREST `appointments` table.
///
/// The table carries a partial unique index on `(doctor_id, date, time_slot)`
/// for rows whose status is not `CANCELLED`; PostgREST reports violations as 409.
pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn filter_params(filter: &AppointmentFilter) -> Vec<String> {
        let mut params = Vec::new();

        if let Some(id) = filter.id {
            params.push(format!("id=eq.{}", id));
        }
        if let Some(doctor_id) = filter.doctor_id {
            params.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = filter.patient_id {
            params.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(date) = filter.date {
            params.push(format!("date=eq.{}", urlencoding::encode(&date.to_string())));
        }
        if let Some(time_slot) = filter.time_slot {
            params.push(format!("time_slot=eq.{}", time_slot.as_str()));
        }
        if let Some(after) = filter.date_after {
            params.push(format!("date=gt.{}", urlencoding::encode(&after.to_string())));
        }
        if let Some(before) = filter.date_before {
            params.push(format!("date=lt.{}", urlencoding::encode(&before.to_string())));
        }

        params
    }

    fn query_path(mut params: Vec<String>, extra: &[String]) -> String {
        params.extend_from_slice(extra);
        if params.is_empty() {
            TABLE_PATH.to_string()
        } else {
            format!("{}?{}", TABLE_PATH, params.join("&"))
        }
    }

    fn map_error(context: &str, err: anyhow::Error) -> AppointmentError {
        if let Some(api) = api_error(&err) {
            if api.is_unique_violation() {
                warn!("{}: slot uniqueness violated: {}", context, api.message);
                return AppointmentError::UniqueViolation(api.message.clone());
            }
        }
        error!("{}: {}", context, err);
        AppointmentError::DatabaseError(err.to_string())
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, AppointmentError> {
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    AppointmentError::DatabaseError(format!("Failed to parse appointment: {}", e))
                })
            })
            .collect()
    }

    fn first_row(rows: Vec<Value>) -> Result<Option<Appointment>, AppointmentError> {
        Ok(Self::parse_rows(rows)?.into_iter().next())
    }

    fn patch_body(patch: &AppointmentPatch) -> Value {
        let mut body = Map::new();

        if let Some(doctor_id) = patch.doctor_id {
            body.insert("doctor_id".to_string(), json!(doctor_id));
        }
        if let Some(date) = patch.date {
            body.insert("date".to_string(), json!(date));
        }
        if let Some(time_slot) = patch.time_slot {
            body.insert("time_slot".to_string(), json!(time_slot));
        }
        if let Some(status) = patch.status {
            body.insert("status".to_string(), json!(status));
        }
        if let Some(reason) = &patch.reason {
            body.insert("reason".to_string(), json!(reason));
        }
        if let Some(notes) = &patch.notes {
            body.insert("notes".to_string(), json!(notes));
        }
        body.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        Value::Object(body)
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn find(
        &self,
        filter: &AppointmentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut extra = Vec::new();

        if !options.order.is_empty() {
            let order = options
                .order
                .iter()
                .map(|(field, direction)| format!("{}.{}", field.column(), direction.as_postgrest()))
                .collect::<Vec<_>>()
                .join(",");
            extra.push(format!("order={}", order));
        }
        if let Some(limit) = options.limit {
            extra.push(format!("limit={}", limit));
        }
        if let Some(offset) = options.offset {
            extra.push(format!("offset={}", offset));
        }

        let path = Self::query_path(Self::filter_params(filter), &extra);
        debug!("Querying appointments: {}", path);

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| Self::map_error("Appointment query failed", e))?;

        Self::parse_rows(rows)
    }

    async fn find_one(&self, filter: &AppointmentFilter) -> Result<Option<Appointment>, AppointmentError> {
        let path = Self::query_path(Self::filter_params(filter), &["limit=1".to_string()]);

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| Self::map_error("Appointment lookup failed", e))?;

        Self::first_row(rows)
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, AppointmentError> {
        let path = Self::query_path(
            Self::filter_params(filter),
            &["select=id".to_string(), "limit=0".to_string()],
        );

        self.supabase
            .count(&path)
            .await
            .map_err(|e| Self::map_error("Appointment count failed", e))
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let now = Utc::now().to_rfc3339();
        let body = json!({
            "patient_id": appointment.patient_id,
            "doctor_id": appointment.doctor_id,
            "date": appointment.date,
            "time_slot": appointment.time_slot,
            "status": appointment.status,
            "reason": appointment.reason,
            "notes": appointment.notes,
            "created_at": now,
            "updated_at": now
        });

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                TABLE_PATH,
                Some(body),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(|e| Self::map_error("Appointment insert failed", e))?;

        Self::first_row(rows)?.ok_or_else(|| {
            AppointmentError::DatabaseError("Insert returned no appointment".to_string())
        })
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> Result<Appointment, AppointmentError> {
        let path = format!("{}?id=eq.{}", TABLE_PATH, id);

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Self::patch_body(&patch)),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(|e| Self::map_error("Appointment update failed", e))?;

        Self::first_row(rows)?.ok_or(AppointmentError::AppointmentNotFound(id))
    }
}
