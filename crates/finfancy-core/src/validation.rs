// Input validation for registration and login
//
// Email comparison is case-insensitive: every email is normalized (trimmed,
// lowercased) before it reaches a store, and stores compare exactly.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AuthError, Result};

/// Minimum password length, in characters
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Maximum length of first/last name, in characters
pub const MAX_NAME_CHARS: usize = 50;

/// Maximum length of an email address (RFC 5321 path limit)
pub const MAX_EMAIL_CHARS: usize = 254;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .expect("email regex is valid")
    })
}

/// Normalize an email into its comparison key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already-normalized email address
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || email.chars().count() > MAX_EMAIL_CHARS {
        return Err(AuthError::validation("email: invalid email address"));
    }
    if !email_regex().is_match(email) {
        return Err(AuthError::validation("email: invalid email address"));
    }
    Ok(())
}

/// Validate password length (no strength policy beyond that)
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::validation(format!(
            "password: must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

/// Validate and trim a name field
pub fn validate_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(AuthError::validation(format!(
            "{}: must be between 1 and {} characters",
            field, MAX_NAME_CHARS
        )));
    }
    Ok(trimmed.to_string())
}
