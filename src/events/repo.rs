use anyhow::Context;
use async_trait::async_trait;

use super::{dto::EventRequest, repo_types::Event};
use crate::db::PgStore;

const COLUMNS: &str = "id, user_id, name, date, location, image, created_at";

#[async_trait]
pub trait EventRepo {
    async fn create_event(&self, owner: i64, req: &EventRequest) -> anyhow::Result<Event>;
    async fn list_events_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Event>>;
    /// Unscoped lookup backing the public event page.
    async fn find_event(&self, id: i64) -> anyhow::Result<Option<Event>>;
    async fn update_event(&self, id: i64, owner: i64, req: &EventRequest)
        -> anyhow::Result<Option<Event>>;
    async fn delete_event(&self, id: i64, owner: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl EventRepo for PgStore {
    async fn create_event(&self, owner: i64, req: &EventRequest) -> anyhow::Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (user_id, name, date, location, image)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(&req.name)
        .bind(req.date)
        .bind(&req.location)
        .bind(&req.image)
        .fetch_one(&self.pool)
        .await
        .context("insert event")?;
        Ok(event)
    }

    async fn list_events_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            "SELECT {COLUMNS} FROM events WHERE user_id = $1 ORDER BY date, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list events")?;
        Ok(rows)
    }

    async fn find_event(&self, id: i64) -> anyhow::Result<Option<Event>> {
        let row = sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("find event")?;
        Ok(row)
    }

    async fn update_event(
        &self,
        id: i64,
        owner: i64,
        req: &EventRequest,
    ) -> anyhow::Result<Option<Event>> {
        let row = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET name = $3, date = $4, location = $5, image = $6
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&req.name)
        .bind(req.date)
        .bind(&req.location)
        .bind(&req.image)
        .fetch_optional(&self.pool)
        .await
        .context("update event")?;
        Ok(row)
    }

    async fn delete_event(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .context("delete event")?;
        Ok(res.rows_affected() > 0)
    }
}
