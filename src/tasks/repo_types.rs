use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "crate::dates::option")]
    pub due_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
