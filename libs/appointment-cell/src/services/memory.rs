use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::pagination::SortDirection;

use crate::models::{Appointment, AppointmentError};
use crate::services::store::{
    AppointmentFilter, AppointmentPatch, AppointmentStore, FindOptions, NewAppointment, SortField,
};

/// Appointment store held in process memory.
///
/// The uniqueness check and the write run under the same write lock, so two
/// concurrent bookings of one slot cannot both succeed.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    rows: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_slot_free(rows: &[Appointment], candidate: &Appointment) -> Result<(), AppointmentError> {
        if candidate.is_cancelled() {
            return Ok(());
        }

        let clash = rows.iter().any(|row| {
            row.id != candidate.id
                && !row.is_cancelled()
                && row.occupies(candidate.doctor_id, candidate.date, candidate.time_slot)
        });

        if clash {
            warn!(
                "Rejected write double-booking doctor {} on {} at {}",
                candidate.doctor_id, candidate.date, candidate.time_slot
            );
            return Err(AppointmentError::UniqueViolation(format!(
                "doctor {} already has an active appointment on {} at {}",
                candidate.doctor_id, candidate.date, candidate.time_slot
            )));
        }

        Ok(())
    }

    fn compare(a: &Appointment, b: &Appointment, order: &[(SortField, SortDirection)]) -> Ordering {
        for (field, direction) in order {
            let ordering = match field {
                SortField::Date => a.date.cmp(&b.date),
                SortField::TimeSlot => a.time_slot.cmp(&b.time_slot),
            };
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn find(
        &self,
        filter: &AppointmentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<Appointment> = rows.iter().filter(|a| filter.matches(a)).cloned().collect();

        // stable: ties keep insertion order
        matched.sort_by(|a, b| Self::compare(a, b, &options.order));

        let offset = options.offset.unwrap_or(0) as usize;
        let limit = options.limit.map_or(usize::MAX, |l| l as usize);

        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_one(&self, filter: &AppointmentFilter) -> Result<Option<Appointment>, AppointmentError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|a| filter.matches(a)).cloned())
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, AppointmentError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|a| filter.matches(a)).count() as u64)
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let now = Utc::now();
        let row = Appointment {
            id: Uuid::new_v4(),
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            date: appointment.date,
            time_slot: appointment.time_slot,
            status: appointment.status,
            reason: appointment.reason,
            notes: appointment.notes,
            created_at: now,
            updated_at: now,
        };

        let mut rows = self.rows.write().await;
        Self::ensure_slot_free(&rows, &row)?;
        rows.push(row.clone());

        debug!("Stored appointment {}", row.id);
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> Result<Appointment, AppointmentError> {
        let mut rows = self.rows.write().await;

        let index = rows
            .iter()
            .position(|a| a.id == id)
            .ok_or(AppointmentError::AppointmentNotFound(id))?;

        let mut updated = rows[index].clone();
        patch.apply_to(&mut updated);
        updated.updated_at = Utc::now();

        Self::ensure_slot_free(&rows, &updated)?;
        rows[index] = updated.clone();

        debug!("Updated appointment {}", id);
        Ok(updated)
    }
}
