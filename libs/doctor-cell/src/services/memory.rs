use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Department, Doctor, DoctorError};
use crate::services::directory::DoctorDirectory;

#[derive(Default)]
struct Inner {
    doctors: Vec<Doctor>,
    departments: HashMap<Uuid, Department>,
}

/// Doctor directory held in process memory, ordered by insertion.
#[derive(Default)]
pub struct InMemoryDoctorDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryDoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_department(&self, department: Department) {
        self.inner.write().await.departments.insert(department.id, department);
    }

    /// Adds or replaces a doctor. The stored copy never carries an embedded department.
    pub async fn upsert(&self, mut doctor: Doctor) {
        let mut inner = self.inner.write().await;
        if let Some(department) = doctor.department.take() {
            inner.departments.entry(department.id).or_insert(department);
        }
        match inner.doctors.iter_mut().find(|d| d.id == doctor.id) {
            Some(existing) => *existing = doctor,
            None => inner.doctors.push(doctor),
        }
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn get_by_id(&self, doctor_id: Uuid, with_department: bool) -> Result<Doctor, DoctorError> {
        let inner = self.inner.read().await;
        let mut doctor = inner
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .cloned()
            .ok_or(DoctorError::NotFound(doctor_id))?;

        if with_department {
            doctor.department = doctor
                .department_id
                .and_then(|id| inner.departments.get(&id).cloned());
        }

        Ok(doctor)
    }

    async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<Doctor>, DoctorError> {
        let inner = self.inner.read().await;
        Ok(inner
            .doctors
            .iter()
            .filter(|d| department_id.is_none() || d.department_id == department_id)
            .cloned()
            .collect())
    }
}
