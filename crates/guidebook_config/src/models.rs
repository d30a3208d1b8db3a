// --- File: crates/guidebook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_CALENDAR_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_TIME_ZONE: &str = "Europe/Zurich";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
// Holds the guide credential store location, e.g. `sqlite://data/guidebook.db`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // GUIDEBOOK__DATABASE__URL
}

// --- Google OAuth Client Config ---
// `client_secret` is normally set to "secret_from_env" in the config file and
// injected from GOOGLE_OAUTH_CLIENT_SECRET at load time.
#[derive(Deserialize, Serialize, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .finish()
    }
}

// --- Google Calendar API Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Time zone attached to start/end times sent on event updates.
    pub time_zone: Option<String>,
    /// Per-request timeout for every outbound call (token endpoint and calendar API).
    pub request_timeout_secs: Option<u64>,
}

impl GcalConfig {
    pub fn time_zone_or_default(&self) -> &str {
        self.time_zone
            .as_deref()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or(DEFAULT_TIME_ZONE)
    }

    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            time_zone: None,
            request_timeout_secs: None,
        }
    }
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_CALENDAR_API_BASE_URL.to_string()
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub google_oauth: Option<GoogleOAuthConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
