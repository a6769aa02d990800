// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate};
use std::fmt;
use std::str::FromStr;

use doctor_cell::models::{Doctor, DoctorError};
use patient_cell::models::{Patient, PatientError};
use shared_models::error::AppError;
use shared_models::pagination::SortDirection;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// One of the fourteen one-hour slots between 07:00 and 21:00.
///
/// Declaration order is chronological, so the derived `Ord` sorts slots by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "a7_8")]
    A7_8,
    #[serde(rename = "a8_9")]
    A8_9,
    #[serde(rename = "a9_10")]
    A9_10,
    #[serde(rename = "a10_11")]
    A10_11,
    #[serde(rename = "a11_12")]
    A11_12,
    #[serde(rename = "a12_13")]
    A12_13,
    #[serde(rename = "a13_14")]
    A13_14,
    #[serde(rename = "a14_15")]
    A14_15,
    #[serde(rename = "a15_16")]
    A15_16,
    #[serde(rename = "a16_17")]
    A16_17,
    #[serde(rename = "a17_18")]
    A17_18,
    #[serde(rename = "a18_19")]
    A18_19,
    #[serde(rename = "a19_20")]
    A19_20,
    #[serde(rename = "a20_21")]
    A20_21,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 14] = [
        TimeSlot::A7_8,
        TimeSlot::A8_9,
        TimeSlot::A9_10,
        TimeSlot::A10_11,
        TimeSlot::A11_12,
        TimeSlot::A12_13,
        TimeSlot::A13_14,
        TimeSlot::A14_15,
        TimeSlot::A15_16,
        TimeSlot::A16_17,
        TimeSlot::A17_18,
        TimeSlot::A18_19,
        TimeSlot::A19_20,
        TimeSlot::A20_21,
    ];

    pub fn start_hour(&self) -> u32 {
        7 + *self as u32
    }

    pub fn end_hour(&self) -> u32 {
        self.start_hour() + 1
    }

    /// Wire name, e.g. `a10_11`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::A7_8 => "a7_8",
            TimeSlot::A8_9 => "a8_9",
            TimeSlot::A9_10 => "a9_10",
            TimeSlot::A10_11 => "a10_11",
            TimeSlot::A11_12 => "a11_12",
            TimeSlot::A12_13 => "a12_13",
            TimeSlot::A13_14 => "a13_14",
            TimeSlot::A14_15 => "a14_15",
            TimeSlot::A15_16 => "a15_16",
            TimeSlot::A16_17 => "a16_17",
            TimeSlot::A17_18 => "a17_18",
            TimeSlot::A18_19 => "a18_19",
            TimeSlot::A19_20 => "a19_20",
            TimeSlot::A20_21 => "a20_21",
        }
    }

    /// Human readable range, e.g. `10:00 - 11:00`.
    pub fn label(&self) -> String {
        format!("{:02}:00 - {:02}:00", self.start_hour(), self.end_hour())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| AppointmentError::ValidationError(format!("Unknown time slot: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn occupies(&self, doctor_id: Uuid, date: NaiveDate, time_slot: TimeSlot) -> bool {
        self.doctor_id == doctor_id && self.date == date && self.time_slot == time_slot
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }
}

/// An appointment with its doctor (department included) and patient loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Doctor,
    pub patient: Patient,
}

// ==============================================================================
// REQUEST/QUERY MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Whose appointments a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentOwner {
    Patient(Uuid),
    Doctor(Uuid),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Exclusive lower bound.
    pub date_from: Option<NaiveDate>,
    /// Widened by two days, then used as an exclusive upper bound.
    pub date_to: Option<NaiveDate>,
    pub order: Option<SortDirection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableDoctorsQuery {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailabilityQuery {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment {0} not found")]
    AppointmentNotFound(Uuid),

    #[error("Patient {0} not found")]
    PatientNotFound(Uuid),

    #[error("Doctor {0} not found")]
    DoctorNotFound(Uuid),

    #[error("{0}")]
    SlotAlreadyBooked(String),

    /// Raised by a store when a write would double-book a slot.
    #[error("Slot uniqueness violated: {0}")]
    UniqueViolation(String),

    #[error("Cannot confirm a cancelled appointment")]
    CannotConfirmCancelled,

    #[error("Failed to check availability: {0}")]
    AvailabilityCheckFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PatientError> for AppointmentError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(id) => AppointmentError::PatientNotFound(id),
            PatientError::DatabaseError(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound(id) => AppointmentError::DoctorNotFound(id),
            DoctorError::DatabaseError(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::AppointmentNotFound(_)
            | AppointmentError::PatientNotFound(_)
            | AppointmentError::DoctorNotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::SlotAlreadyBooked(msg) => AppError::Conflict(msg),
            AppointmentError::UniqueViolation(_) => {
                AppError::Conflict("This time slot is already booked".to_string())
            }
            AppointmentError::CannotConfirmCancelled => AppError::BadRequest(err.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::AvailabilityCheckFailed(_) => AppError::Internal(err.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
