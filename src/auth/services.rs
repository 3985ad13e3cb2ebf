use lazy_static::lazy_static;
use regex::Regex;

use super::dto::RegisterRequest;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes the email in place and checks the registration fields.
pub fn validate_registration(payload: &mut RegisterRequest) -> Result<(), AppError> {
    payload.name = payload.name.trim().to_string();
    payload.email = normalize_email(&payload.email);

    if payload.name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::validation("Invalid email"));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }
    Ok(())
}
