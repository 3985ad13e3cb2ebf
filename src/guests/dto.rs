use serde::Deserialize;

use crate::{
    auth::services::{is_valid_email, normalize_email},
    error::AppError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct GuestRequest {
    pub event_id: i64,
    pub name: String,
    pub email: String,
}

/// A guest stays attached to the event it was invited to; only the contact
/// fields can change.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestUpdate {
    pub name: String,
    pub email: String,
}

fn clean_contact(name: &str, email: &str) -> Result<(String, String), AppError> {
    let name = name.trim().to_string();
    let email = normalize_email(email);
    if name.is_empty() {
        return Err(AppError::validation("Guest name is required"));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok((name, email))
}

impl GuestRequest {
    pub fn validate(self) -> Result<Self, AppError> {
        let (name, email) = clean_contact(&self.name, &self.email)?;
        Ok(Self { name, email, ..self })
    }
}

impl GuestUpdate {
    pub fn validate(self) -> Result<Self, AppError> {
        let (name, email) = clean_contact(&self.name, &self.email)?;
        Ok(Self { name, email })
    }
}
