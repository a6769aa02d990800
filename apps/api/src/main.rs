use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::services::{AppointmentAvailabilityService, InMemoryAppointmentStore, SupabaseAppointmentStore};
use doctor_cell::services::{DoctorService, InMemoryDoctorDirectory};
use patient_cell::services::{InMemoryPatientDirectory, PatientService};
use shared_config::{AppConfig, StorageBackend};
use shared_database::supabase::SupabaseClient;

use router::ApiServices;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hospital booking API server");

    // Load configuration
    let config = AppConfig::from_env();
    info!("Using {} storage backend", config.storage_backend);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let services = build_services(&config);

    // Build the application router
    let app = router::create_router(services)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_services(config: &AppConfig) -> ApiServices {
    match config.storage_backend {
        StorageBackend::Supabase => {
            let supabase = Arc::new(SupabaseClient::new(config));
            let patients = Arc::new(PatientService::with_client(Arc::clone(&supabase)));
            let doctors = Arc::new(DoctorService::with_client(Arc::clone(&supabase)));
            let store = Arc::new(SupabaseAppointmentStore::with_client(supabase));

            ApiServices {
                appointments: Arc::new(
                    AppointmentAvailabilityService::new(store, patients.clone(), doctors.clone())
                        .with_default_page_size(config.default_page_size),
                ),
                patients,
                doctors,
            }
        }
        StorageBackend::Memory => {
            warn!("In-memory storage selected: directories start empty and data is lost when the process exits");
            let patients = Arc::new(InMemoryPatientDirectory::new());
            let doctors = Arc::new(InMemoryDoctorDirectory::new());
            let store = Arc::new(InMemoryAppointmentStore::new());

            ApiServices {
                appointments: Arc::new(
                    AppointmentAvailabilityService::new(store, patients.clone(), doctors.clone())
                        .with_default_page_size(config.default_page_size),
                ),
                patients,
                doctors,
            }
        }
    }
}
