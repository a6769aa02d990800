pub mod directory;
pub mod memory;
pub mod patient;

pub use directory::PatientDirectory;
pub use memory::InMemoryPatientDirectory;
pub use patient::PatientService;
