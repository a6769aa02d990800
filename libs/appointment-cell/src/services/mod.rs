pub mod availability;
pub mod lifecycle;
pub mod memory;
pub mod store;
pub mod supabase_store;

pub use availability::AppointmentAvailabilityService;
pub use lifecycle::AppointmentLifecycleService;
pub use memory::InMemoryAppointmentStore;
pub use store::{AppointmentFilter, AppointmentPatch, AppointmentStore, FindOptions, NewAppointment, SortField};
pub use supabase_store::SupabaseAppointmentStore;
