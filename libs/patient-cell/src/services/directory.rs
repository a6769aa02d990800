use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Patient, PatientError};

/// Existence lookups for patients, as needed by booking.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    async fn get_by_id(&self, patient_id: Uuid) -> Result<Patient, PatientError>;
}
