// Authentication module
// Provides cookie-backed session auth over the finfancy-core Authenticator

pub mod config;
pub mod middleware;
pub mod routes;

pub use config::{AuthConfig, Environment, SESSION_COOKIE};
pub use middleware::{AuthState, AuthUser, FromRef};
