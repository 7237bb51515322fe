// Authentication configuration loaded from environment variables.
// Decision: Default to the "local" environment, where cookies are not marked Secure
// Decision: Session lifetime is configured in minutes (SESSION_EXP_MINUTES)
// Decision: Out-of-range lifetimes fall back to the default

use std::time::Duration;

/// Default session lifetime: one day
pub const DEFAULT_SESSION_MINUTES: u64 = 60 * 24;

/// Longest accepted session lifetime: one year
pub const MAX_SESSION_MINUTES: u64 = 60 * 24 * 365;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_id";

/// Deployment environment tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development (plain HTTP)
    #[default]
    Local,
    /// Any deployed environment (staging, production, ...)
    Deployed(String),
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("local") {
            Environment::Local
        } else {
            Environment::Deployed(s.to_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Local => "local",
            Environment::Deployed(name) => name,
        }
    }

    pub fn is_local(&self) -> bool {
        *self == Environment::Local
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime of a new session (and Max-Age of its cookie)
    pub session_lifetime: Duration,
    /// Environment, controls the Secure cookie flag
    pub environment: Environment,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime: Duration::from_secs(DEFAULT_SESSION_MINUTES * 60),
            environment: Environment::Local,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let session_secs = lookup("SESSION_EXP_MINUTES")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|mins| (1..=MAX_SESSION_MINUTES).contains(mins))
            .and_then(|mins| mins.checked_mul(60))
            .unwrap_or(DEFAULT_SESSION_MINUTES * 60);

        let environment = lookup("ENV")
            .map(|s| Environment::parse(&s))
            .unwrap_or_default();

        Self {
            session_lifetime: Duration::from_secs(session_secs),
            environment,
        }
    }

    /// Cookies are Secure everywhere except local development
    pub fn secure_cookies(&self) -> bool {
        !self.environment.is_local()
    }
}
