use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Patient, PatientError};
use crate::services::directory::PatientDirectory;

#[derive(Default)]
pub struct InMemoryPatientDirectory {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: Vec<Patient>) -> Self {
        Self {
            patients: RwLock::new(patients),
        }
    }

    /// Adds or replaces a patient with the same id.
    pub async fn upsert(&self, patient: Patient) {
        let mut patients = self.patients.write().await;
        match patients.iter_mut().find(|p| p.id == patient.id) {
            Some(existing) => *existing = patient,
            None => patients.push(patient),
        }
    }
}

#[async_trait]
impl PatientDirectory for InMemoryPatientDirectory {
    async fn get_by_id(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.id == patient_id)
            .cloned()
            .ok_or(PatientError::NotFound(patient_id))
    }
}
