// FinFancy HTTP API
//
// Library half of the finfancy-api binary so the router can be built in tests.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod sweeper;

pub use app::{build_app, openapi_doc, ApiDoc};
pub use config::Settings;
pub use sweeper::spawn_session_sweeper;
