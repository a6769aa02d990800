use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shared_models::pagination::SortDirection;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, TimeSlot};

/// Conjunction of optional predicates over appointment rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    /// `date > date_after`
    pub date_after: Option<NaiveDate>,
    /// `date < date_before`
    pub date_before: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Exact (doctor, date, slot) triple, regardless of status.
    pub fn slot(doctor_id: Uuid, date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self {
            doctor_id: Some(doctor_id),
            date: Some(date),
            time_slot: Some(time_slot),
            ..Self::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.id.is_none_or(|id| appointment.id == id)
            && self.doctor_id.is_none_or(|id| appointment.doctor_id == id)
            && self.patient_id.is_none_or(|id| appointment.patient_id == id)
            && self.date.is_none_or(|date| appointment.date == date)
            && self.time_slot.is_none_or(|slot| appointment.time_slot == slot)
            && self.date_after.is_none_or(|after| appointment.date > after)
            && self.date_before.is_none_or(|before| appointment.date < before)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    TimeSlot,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::TimeSlot => "time_slot",
        }
    }
}

/// Ordering (first entry is the primary key) and paging for `find`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub order: Vec<(SortField, SortDirection)>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub status: Option<AppointmentStatus>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(doctor_id) = self.doctor_id {
            appointment.doctor_id = doctor_id;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time_slot) = self.time_slot {
            appointment.time_slot = time_slot;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(reason) = &self.reason {
            appointment.reason = Some(reason.clone());
        }
        if let Some(notes) = &self.notes {
            appointment.notes = Some(notes.clone());
        }
    }
}

/// Persistence for appointments.
///
/// Implementations must reject (`AppointmentError::UniqueViolation`) any write
/// that would leave two non-cancelled appointments on the same
/// (doctor, date, slot). Raw storage failures surface as
/// `AppointmentError::DatabaseError`.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn find(
        &self,
        filter: &AppointmentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn find_one(&self, filter: &AppointmentFilter) -> Result<Option<Appointment>, AppointmentError>;

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, AppointmentError>;

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError>;

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> Result<Appointment, AppointmentError>;
}
