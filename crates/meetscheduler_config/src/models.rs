// --- File: crates/meetscheduler_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 14;

// --- Backend Endpoint Config ---
// One per backend: the primary (identity/profile) and the scheduling backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiEndpointConfig {
    pub base_url: String, // Loaded via MEETSCHEDULER__<SECTION>__BASE_URL
    pub timeout_secs: u64,
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// --- Session Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the durable session file lives. Defaults to the platform data dir.
    pub storage_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolves the storage path, falling back to `<data dir>/meetscheduler/session.json`.
    pub fn resolved_storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetscheduler")
            .join("session.json")
    }
}

// --- Booking Page Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BookingConfig {
    pub lookahead_days: u32,
    /// IANA zone name used for grouping and display. `None` means the machine's local zone.
    pub display_time_zone: Option<String>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            display_time_zone: None,
        }
    }
}

// --- Auth Routes ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    pub sign_in_route: String,
    pub after_login_route: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            sign_in_route: "/connect".to_string(),
            after_login_route: "/app/dashboard".to_string(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub primary_api: ApiEndpointConfig,
    pub scheduling_api: ApiEndpointConfig,
    pub session: SessionConfig,
    pub booking: BookingConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Checks the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        for (name, endpoint) in [
            ("primary_api", &self.primary_api),
            ("scheduling_api", &self.scheduling_api),
        ] {
            let url = endpoint.base_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{name}.base_url must be an http(s) URL, got '{url}'"));
            }
            if endpoint.timeout_secs == 0 {
                return Err(format!("{name}.timeout_secs must be greater than zero"));
            }
        }
        if self.booking.lookahead_days == 0 {
            return Err("booking.lookahead_days must be greater than zero".to_string());
        }
        if let Some(zone) = &self.booking.display_time_zone {
            zone.parse::<chrono_tz::Tz>()
                .map_err(|_| format!("booking.display_time_zone '{zone}' is not a known time zone"))?;
        }
        if !self.auth.sign_in_route.starts_with('/') {
            return Err("auth.sign_in_route must be an absolute path".to_string());
        }
        Ok(())
    }
}
