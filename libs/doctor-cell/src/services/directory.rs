use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Doctor, DoctorError};

#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Loads one doctor; `with_department` populates `Doctor::department`.
    async fn get_by_id(&self, doctor_id: Uuid, with_department: bool) -> Result<Doctor, DoctorError>;

    /// All doctors, optionally restricted to one department, in directory order.
    async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<Doctor>, DoctorError>;
}
