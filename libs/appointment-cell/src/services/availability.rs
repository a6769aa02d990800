// libs/appointment-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use doctor_cell::services::{DoctorDirectory, DoctorService};
use patient_cell::services::{PatientDirectory, PatientService};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::pagination::{page_offset, PagedResult};
use shared_utils::dates::{format_display_date, widened_upper_bound};

use crate::models::{
    Appointment, AppointmentDetails, AppointmentError, AppointmentListQuery, AppointmentOwner,
    AppointmentStatus, CreateAppointmentRequest, RescheduleAppointmentRequest, TimeSlot,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::store::{
    AppointmentFilter, AppointmentPatch, AppointmentStore, FindOptions, NewAppointment, SortField,
};
use crate::services::supabase_store::SupabaseAppointmentStore;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Slot booking rules: availability queries and the appointment lifecycle.
///
/// The availability check before each write gives callers a readable conflict
/// message; the store's uniqueness constraint is what actually prevents two
/// concurrent bookings from both landing.
pub struct AppointmentAvailabilityService {
    store: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientDirectory>,
    doctors: Arc<dyn DoctorDirectory>,
    lifecycle_service: AppointmentLifecycleService,
    default_page_size: u32,
}

impl AppointmentAvailabilityService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        patients: Arc<dyn PatientDirectory>,
        doctors: Arc<dyn DoctorDirectory>,
    ) -> Self {
        Self {
            store,
            patients,
            doctors,
            lifecycle_service: AppointmentLifecycleService::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Wires every collaborator to the same Supabase project.
    pub fn supabase(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));

        Self::new(
            Arc::new(SupabaseAppointmentStore::with_client(Arc::clone(&supabase))),
            Arc::new(PatientService::with_client(Arc::clone(&supabase))),
            Arc::new(DoctorService::with_client(supabase)),
        )
        .with_default_page_size(config.default_page_size)
    }

    pub fn with_default_page_size(mut self, per_page: u32) -> Self {
        self.default_page_size = per_page.max(1);
        self
    }

    // ==========================================================================
    // AVAILABILITY
    // ==========================================================================

    /// `true` iff no appointment of any status exists for the triple.
    pub async fn is_slot_available(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<bool, AppointmentError> {
        debug!("Checking slot {} on {} for doctor {}", time_slot, date, doctor_id);

        let filter = AppointmentFilter::slot(doctor_id, date, time_slot);
        match self.store.find_one(&filter).await {
            Ok(existing) => Ok(existing.is_none()),
            Err(AppointmentError::DatabaseError(msg)) => {
                error!("Availability check failed for doctor {}: {}", doctor_id, msg);
                Err(AppointmentError::AvailabilityCheckFailed(msg))
            }
            Err(other) => Err(other),
        }
    }

    pub async fn list_available_doctors(
        &self,
        date: NaiveDate,
        time_slot: TimeSlot,
        department_id: Option<Uuid>,
    ) -> Result<Vec<Doctor>, AppointmentError> {
        debug!("Listing doctors free on {} at {} (department: {:?})", date, time_slot, department_id);

        let filter = AppointmentFilter {
            date: Some(date),
            time_slot: Some(time_slot),
            ..AppointmentFilter::default()
        };
        let booked: HashSet<Uuid> = self
            .store
            .find(&filter, &FindOptions::default())
            .await?
            .into_iter()
            .map(|appointment| appointment.doctor_id)
            .collect();

        let doctors = self.doctors.list(department_id).await?;

        if booked.is_empty() {
            return Ok(doctors);
        }

        Ok(doctors
            .into_iter()
            .filter(|doctor| !booked.contains(&doctor.id))
            .collect())
    }

    /// Unbooked slots for the doctor on the date, earliest first.
    pub async fn list_available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, AppointmentError> {
        debug!("Listing free slots for doctor {} on {}", doctor_id, date);

        let filter = AppointmentFilter {
            doctor_id: Some(doctor_id),
            date: Some(date),
            ..AppointmentFilter::default()
        };
        let booked: HashSet<TimeSlot> = self
            .store
            .find(&filter, &FindOptions::default())
            .await?
            .into_iter()
            .map(|appointment| appointment.time_slot)
            .collect();

        Ok(TimeSlot::ALL
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .collect())
    }

    // ==========================================================================
    // LIFECYCLE
    // ==========================================================================

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentDetails, AppointmentError> {
        info!("Booking appointment for patient {} with doctor {} on {} at {}",
              request.patient_id, request.doctor_id, request.date, request.time_slot);

        self.patients.get_by_id(request.patient_id).await?;
        let doctor = self.doctors.get_by_id(request.doctor_id, false).await?;

        let conflict_message = || {
            format!(
                "This time slot {} is already booked with {} on {}.",
                request.time_slot.label(),
                doctor.display_name(),
                format_display_date(request.date)
            )
        };

        if !self.is_slot_available(request.doctor_id, request.date, request.time_slot).await? {
            warn!("Slot {} on {} already taken for doctor {}",
                  request.time_slot, request.date, request.doctor_id);
            return Err(AppointmentError::SlotAlreadyBooked(conflict_message()));
        }

        let created = self
            .store
            .insert(NewAppointment {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                date: request.date,
                time_slot: request.time_slot,
                status: AppointmentStatus::Pending,
                reason: request.reason.clone(),
                notes: request.notes.clone(),
            })
            .await
            .map_err(|e| match e {
                AppointmentError::UniqueViolation(_) => {
                    warn!("Lost booking race for doctor {} on {}", request.doctor_id, request.date);
                    AppointmentError::SlotAlreadyBooked(conflict_message())
                }
                other => other,
            })?;

        info!("Appointment {} booked with doctor {}", created.id, created.doctor_id);
        self.get_appointment(created.id).await
    }

    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<AppointmentDetails, AppointmentError> {
        debug!("Cancelling appointment: {}", appointment_id);
        self.transition(appointment_id, AppointmentStatus::Cancelled).await
    }

    pub async fn confirm_appointment(&self, appointment_id: Uuid) -> Result<AppointmentDetails, AppointmentError> {
        debug!("Confirming appointment: {}", appointment_id);
        self.transition(appointment_id, AppointmentStatus::Confirmed).await
    }

    /// Moves an appointment to a new doctor/date/slot and resets it to `Pending`.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<AppointmentDetails, AppointmentError> {
        debug!("Rescheduling appointment: {}", appointment_id);

        let current = self.find_appointment(appointment_id).await?;
        let doctor = self.doctors.get_by_id(request.doctor_id, false).await?;

        self.lifecycle_service
            .validate_status_transition(current.status, AppointmentStatus::Pending)?;

        let conflict_message = || {
            format!(
                "{} is already booked on {} at {}.",
                doctor.display_name(),
                format_display_date(request.date),
                request.time_slot.label()
            )
        };

        if !self.is_slot_available(request.doctor_id, request.date, request.time_slot).await? {
            warn!("Cannot reschedule {}: slot {} on {} taken for doctor {}",
                  appointment_id, request.time_slot, request.date, request.doctor_id);
            return Err(AppointmentError::SlotAlreadyBooked(conflict_message()));
        }

        let patch = AppointmentPatch {
            doctor_id: Some(request.doctor_id),
            date: Some(request.date),
            time_slot: Some(request.time_slot),
            status: Some(AppointmentStatus::Pending),
            reason: request.reason.clone(),
            notes: request.notes.clone(),
        };

        self.store
            .update(appointment_id, patch)
            .await
            .map_err(|e| match e {
                AppointmentError::UniqueViolation(_) => AppointmentError::SlotAlreadyBooked(conflict_message()),
                other => other,
            })?;

        info!("Appointment {} rescheduled to {} at {} with doctor {}",
              appointment_id, request.date, request.time_slot, request.doctor_id);
        self.get_appointment(appointment_id).await
    }

    /// Loads an appointment with doctor (and department) and patient populated.
    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<AppointmentDetails, AppointmentError> {
        let appointment = self.find_appointment(appointment_id).await?;
        let doctor = self.doctors.get_by_id(appointment.doctor_id, true).await?;
        let patient = self.patients.get_by_id(appointment.patient_id).await?;

        Ok(AppointmentDetails {
            appointment,
            doctor,
            patient,
        })
    }

    // ==========================================================================
    // LISTINGS
    // ==========================================================================

    pub async fn list_appointments(
        &self,
        owner: AppointmentOwner,
        query: AppointmentListQuery,
    ) -> Result<PagedResult<Appointment>, AppointmentError> {
        debug!("Listing appointments for {:?} with {:?}", owner, query);

        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(self.default_page_size);
        if page < 1 {
            return Err(AppointmentError::ValidationError("page must be at least 1".to_string()));
        }
        if per_page < 1 {
            return Err(AppointmentError::ValidationError("per_page must be at least 1".to_string()));
        }

        let mut filter = AppointmentFilter {
            date_after: query.date_from,
            date_before: query.date_to.map(widened_upper_bound),
            ..AppointmentFilter::default()
        };
        match owner {
            AppointmentOwner::Patient(id) => filter.patient_id = Some(id),
            AppointmentOwner::Doctor(id) => filter.doctor_id = Some(id),
        }

        let direction = query.order.unwrap_or_default();
        let mut order = vec![(SortField::Date, direction)];
        if matches!(owner, AppointmentOwner::Doctor(_)) && query.date_to.is_some() {
            order.push((SortField::TimeSlot, direction));
        }

        let total_items = self.store.count(&filter).await?;
        let options = FindOptions {
            order,
            offset: Some(page_offset(page, per_page)),
            limit: Some(u64::from(per_page)),
        };
        let data = self.store.find(&filter, &options).await?;

        Ok(PagedResult::new(data, page, per_page, total_items))
    }

    // ==========================================================================
    // HELPERS
    // ==========================================================================

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store
            .find_one(&AppointmentFilter::by_id(appointment_id))
            .await?
            .ok_or(AppointmentError::AppointmentNotFound(appointment_id))
    }

    async fn transition(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<AppointmentDetails, AppointmentError> {
        let current = self.find_appointment(appointment_id).await?;

        self.lifecycle_service
            .validate_status_transition(current.status, new_status)?;

        self.store
            .update(appointment_id, AppointmentPatch::status(new_status))
            .await?;

        info!("Appointment {} moved from {} to {}", appointment_id, current.status, new_status);
        self.get_appointment(appointment_id).await
    }
}
