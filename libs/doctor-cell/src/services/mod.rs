pub mod directory;
pub mod doctor;
pub mod memory;

pub use directory::DoctorDirectory;
pub use doctor::DoctorService;
pub use memory::InMemoryDoctorDirectory;
