use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Which persistence backend the API wires into the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Supabase,
    /// Process-local stores that start empty. No route creates doctors or
    /// patients, so bookings only succeed once something seeds the in-memory
    /// directories (tests and local experiments).
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(StorageBackend::Supabase),
            "memory" | "in-memory" | "in_memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Supabase => write!(f, "supabase"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub storage_backend: StorageBackend,
    pub server_port: u16,
    pub default_page_size: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let supabase_url = env::var("SUPABASE_URL")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            });
        let supabase_anon_key = env::var("SUPABASE_ANON_PUBLIC_KEY")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                String::new()
            });

        let supabase_ready = !supabase_url.is_empty() && !supabase_anon_key.is_empty();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                warn!("{}, falling back to memory", e);
                StorageBackend::Memory
            }),
            Err(_) => default_backend(supabase_ready),
        };

        let server_port = parse_or_default("SERVER_PORT", DEFAULT_SERVER_PORT);
        let default_page_size = parse_or_default("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1);

        let config = Self {
            supabase_url,
            supabase_anon_key,
            storage_backend,
            server_port,
            default_page_size,
        };

        if config.storage_backend == StorageBackend::Supabase && !config.is_configured() {
            warn!("Supabase backend selected but not fully configured - missing environment variables");
        }

        config
    }

    /// Configuration for a process that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            storage_backend: StorageBackend::Memory,
            server_port: DEFAULT_SERVER_PORT,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

/// Backend used when `STORAGE_BACKEND` is unset.
fn default_backend(supabase_ready: bool) -> StorageBackend {
    if supabase_ready {
        return StorageBackend::Supabase;
    }

    warn!(
        "STORAGE_BACKEND not set and Supabase not configured, using memory: \
         doctors and patients start empty and cannot be added over HTTP, \
         so bookings will fail with 404 until SUPABASE_URL and SUPABASE_ANON_PUBLIC_KEY are set"
    );
    StorageBackend::Memory
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
