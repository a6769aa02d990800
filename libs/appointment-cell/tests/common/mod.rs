#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use appointment_cell::models::{Appointment, AppointmentError, CreateAppointmentRequest, TimeSlot};
use appointment_cell::services::{
    AppointmentAvailabilityService, AppointmentFilter, AppointmentPatch, AppointmentStore, FindOptions,
    InMemoryAppointmentStore, NewAppointment,
};
use doctor_cell::models::{Department, Doctor};
use doctor_cell::services::InMemoryDoctorDirectory;
use patient_cell::models::Patient;
use patient_cell::services::InMemoryPatientDirectory;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn booking(patient: &Patient, doctor: &Doctor, on: NaiveDate, time_slot: TimeSlot) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id: patient.id,
        doctor_id: doctor.id,
        date: on,
        time_slot,
        reason: None,
        notes: None,
    }
}

/// Booking service over in-memory collaborators with one seeded department.
pub struct Fixture {
    pub service: Arc<AppointmentAvailabilityService>,
    pub store: Arc<InMemoryAppointmentStore>,
    pub doctors: Arc<InMemoryDoctorDirectory>,
    pub patients: Arc<InMemoryPatientDirectory>,
    pub department: Department,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_store(Arc::new(InMemoryAppointmentStore::new())).await
    }

    pub async fn with_store(store: Arc<InMemoryAppointmentStore>) -> Self {
        let doctors = Arc::new(InMemoryDoctorDirectory::new());
        let patients = Arc::new(InMemoryPatientDirectory::new());
        let department = Department {
            id: Uuid::new_v4(),
            name: "General Medicine".to_string(),
        };
        doctors.add_department(department.clone()).await;

        let service = Arc::new(AppointmentAvailabilityService::new(
            store.clone(),
            patients.clone(),
            doctors.clone(),
        ));

        Self {
            service,
            store,
            doctors,
            patients,
            department,
        }
    }

    /// Service over an arbitrary store, sharing this fixture's directories.
    pub fn service_over(&self, store: Arc<dyn AppointmentStore>) -> AppointmentAvailabilityService {
        AppointmentAvailabilityService::new(store, self.patients.clone(), self.doctors.clone())
    }

    pub async fn add_doctor(&self, first_name: &str, last_name: &str) -> Doctor {
        self.add_doctor_in(first_name, last_name, Some(self.department.id)).await
    }

    pub async fn add_doctor_in(&self, first_name: &str, last_name: &str, department_id: Option<Uuid>) -> Doctor {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            department_id,
            department: None,
        };
        self.doctors.upsert(doctor.clone()).await;
        doctor
    }

    pub async fn add_patient(&self, first_name: &str, last_name: &str) -> Patient {
        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: None,
            phone_number: None,
            date_of_birth: None,
        };
        self.patients.upsert(patient.clone()).await;
        patient
    }
}

/// Store whose every call fails like an unreachable database.
pub struct FailingStore;

#[async_trait]
impl AppointmentStore for FailingStore {
    async fn find(&self, _: &AppointmentFilter, _: &FindOptions) -> Result<Vec<Appointment>, AppointmentError> {
        Err(AppointmentError::DatabaseError("connection refused".to_string()))
    }

    async fn find_one(&self, _: &AppointmentFilter) -> Result<Option<Appointment>, AppointmentError> {
        Err(AppointmentError::DatabaseError("connection refused".to_string()))
    }

    async fn count(&self, _: &AppointmentFilter) -> Result<u64, AppointmentError> {
        Err(AppointmentError::DatabaseError("connection refused".to_string()))
    }

    async fn insert(&self, _: NewAppointment) -> Result<Appointment, AppointmentError> {
        Err(AppointmentError::DatabaseError("connection refused".to_string()))
    }

    async fn update(&self, _: Uuid, _: AppointmentPatch) -> Result<Appointment, AppointmentError> {
        Err(AppointmentError::DatabaseError("connection refused".to_string()))
    }
}

/// Store that reports every slot as free but writes through to a real store,
/// reproducing the window between the availability check and the insert.
pub struct StaleReadStore {
    pub inner: Arc<InMemoryAppointmentStore>,
}

#[async_trait]
impl AppointmentStore for StaleReadStore {
    async fn find(&self, filter: &AppointmentFilter, options: &FindOptions) -> Result<Vec<Appointment>, AppointmentError> {
        self.inner.find(filter, options).await
    }

    async fn find_one(&self, filter: &AppointmentFilter) -> Result<Option<Appointment>, AppointmentError> {
        if filter.id.is_some() {
            self.inner.find_one(filter).await
        } else {
            Ok(None)
        }
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, AppointmentError> {
        self.inner.count(filter).await
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        self.inner.insert(appointment).await
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> Result<Appointment, AppointmentError> {
        self.inner.update(id, patch).await
    }
}
