// Session-based authentication core
//
// This crate provides the DB-agnostic authentication subsystem of the FinFancy
// backend: credential hashing, session issuance, session resolution (the gate in
// front of every protected route) and expiry cleanup.
//
// Key design decisions:
// - Uses traits (UserStore, SessionStore) for pluggable backends
// - Stores are injected into the Authenticator at construction time
// - Session tokens are opaque random strings, every request pays one store lookup
// - Error taxonomy distinguishes session-state failures internally; transports
//   collapse them into a single "not authenticated" rejection

pub mod authenticator;
pub mod error;
pub mod password;
pub mod session;
pub mod traits;
pub mod user;
pub mod validation;

// In-memory implementations for dev mode and testing
pub mod memory;

// Re-exports for convenience
pub use authenticator::{Authenticator, Registration};
pub use error::{AuthError, Result, StoreError, StoreResult};
pub use memory::{InMemorySessionStore, InMemoryUserStore};
pub use session::{IssuedSession, Session, SessionToken};
pub use traits::{SessionStore, UserStore};
pub use user::{User, DEFAULT_BUDGET_LIMIT};
