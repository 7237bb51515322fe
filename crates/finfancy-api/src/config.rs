// Server settings loaded from environment variables (optionally via .env)
// Decision: Missing DATABASE_URL means dev mode with in-memory stores

use std::time::Duration;

use crate::auth::AuthConfig;

pub const DEFAULT_APP_NAME: &str = "FinFancy API";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Server settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    /// Prefix for all API routes (e.g. "/api/v1")
    pub api_prefix: String,
    /// CORS origins; empty means same-origin only
    pub allowed_origins: Vec<String>,
    pub bind_addr: String,
    /// Postgres URL; None selects the in-memory stores
    pub database_url: Option<String>,
    /// Interval of the expired-session sweep; None disables it
    pub session_sweep_interval: Option<Duration>,
    pub auth: AuthConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            allowed_origins: Vec::new(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            session_sweep_interval: Some(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)),
            auth: AuthConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let app_name = lookup("APP_NAME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let api_prefix = lookup("API_V1_STR")
            .map(|s| normalize_prefix(&s))
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());

        // Example: ALLOWED_ORIGINS="http://localhost:3000,http://127.0.0.1:3000"
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let sweep_secs = lookup("SESSION_SWEEP_INTERVAL_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        let session_sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        let auth = AuthConfig::from_lookup(&lookup);

        Self {
            app_name,
            api_prefix,
            allowed_origins,
            bind_addr,
            database_url,
            session_sweep_interval,
            auth,
        }
    }
}

/// "api/v1/" -> "/api/v1"; "" or "/" -> "" (no prefix)
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
