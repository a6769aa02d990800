use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, DoctorError};
use crate::services::directory::DoctorDirectory;

/// PostgREST embedding of the `departments` relation under the `department` key.
const SELECT_WITH_DEPARTMENT: &str = "*,department:departments(*)";

pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn fetch_rows(&self, path: &str) -> Result<Vec<Value>, DoctorError> {
        self.supabase.request(Method::GET, path, None).await.map_err(|e| {
            error!("Doctor query failed ({}): {}", path, e);
            DoctorError::DatabaseError(e.to_string())
        })
    }

    fn parse_doctor(row: Value) -> Result<Doctor, DoctorError> {
        serde_json::from_value(row)
            .map_err(|e| DoctorError::DatabaseError(format!("Failed to parse doctor: {}", e)))
    }
}

#[async_trait]
impl DoctorDirectory for DoctorService {
    async fn get_by_id(&self, doctor_id: Uuid, with_department: bool) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {} (with department: {})", doctor_id, with_department);

        let mut path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        if with_department {
            path.push_str(&format!("&select={}", SELECT_WITH_DEPARTMENT));
        }

        let row = self
            .fetch_rows(&path)
            .await?
            .into_iter()
            .next()
            .ok_or(DoctorError::NotFound(doctor_id))?;

        Self::parse_doctor(row)
    }

    async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors (department: {:?})", department_id);

        let path = match department_id {
            Some(id) => format!("/rest/v1/doctors?department_id=eq.{}", id),
            None => "/rest/v1/doctors".to_string(),
        };

        self.fetch_rows(&path)
            .await?
            .into_iter()
            .map(Self::parse_doctor)
            .collect()
    }
}
