use serde::Deserialize;
use time::Date;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct TaskRequest {
    pub event_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "crate::dates::option")]
    pub due_date: Option<Date>,
}

/// Full replacement: omitting `description` or `due_date` clears them.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "crate::dates::option")]
    pub due_date: Option<Date>,
}

fn clean(title: &str, description: Option<String>) -> Result<(String, Option<String>), AppError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("Task title is required"));
    }
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    Ok((title, description))
}

impl TaskRequest {
    pub fn validate(self) -> Result<Self, AppError> {
        let (title, description) = clean(&self.title, self.description)?;
        Ok(Self {
            title,
            description,
            ..self
        })
    }
}

impl TaskUpdate {
    pub fn validate(self) -> Result<Self, AppError> {
        let (title, description) = clean(&self.title, self.description)?;
        Ok(Self {
            title,
            description,
            due_date: self.due_date,
        })
    }
}
