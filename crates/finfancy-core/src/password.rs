// Password hashing using Argon2id
// Decision: PHC string digests carry algorithm, version, parameters and salt,
// so verification keeps working after the default parameters change

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params,
};
use std::sync::OnceLock;
use tracing::warn;

use crate::error::{AuthError, Result};

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored digest.
///
/// Malformed digests are a verification failure, not an error.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Check whether a digest was produced with something other than the current defaults
pub fn needs_rehash(digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return true;
    };

    if parsed.algorithm != Algorithm::Argon2id.ident() {
        return true;
    }

    let current = Params::default();
    match Params::try_from(&parsed) {
        Ok(params) => {
            params.m_cost() != current.m_cost()
                || params.t_cost() != current.t_cost()
                || params.p_cost() != current.p_cost()
        }
        Err(_) => true,
    }
}

/// Well-formed digest with the default cost parameters (zeroed output, matches nothing)
const FALLBACK_DUMMY_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Digest used to equalize work when the account does not exist
pub(crate) fn dummy_digest() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| match hash_password("finfancy-dummy-password") {
        Ok(digest) => digest,
        Err(e) => {
            warn!("Failed to build dummy digest, using fixed fallback: {}", e);
            FALLBACK_DUMMY_DIGEST.to_string()
        }
    })
}
