use serde::Deserialize;
use time::Date;

use crate::error::AppError;

/// Body of both `POST /events` and `PUT /events/:id`. The owner is always
/// the caller, never a body field.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    pub name: String,
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl EventRequest {
    pub fn validate(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.location = self.location.trim().to_string();
        self.image = self
            .image
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());

        if self.name.is_empty() {
            return Err(AppError::validation("Event name is required"));
        }
        if self.location.is_empty() {
            return Err(AppError::validation("Event location is required"));
        }
        Ok(self)
    }
}
