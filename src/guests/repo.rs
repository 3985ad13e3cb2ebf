use anyhow::Context;
use async_trait::async_trait;

use super::{
    dto::{GuestRequest, GuestUpdate},
    repo_types::Guest,
};
use crate::db::PgStore;

const COLUMNS: &str = "id, event_id, user_id, name, email, created_at";

#[async_trait]
pub trait GuestRepo {
    async fn create_guest(&self, owner: i64, req: &GuestRequest) -> anyhow::Result<Guest>;
    async fn list_guests_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Guest>>;
    async fn list_guests_for_event(&self, event_id: i64, owner: i64)
        -> anyhow::Result<Vec<Guest>>;
    async fn find_guest(&self, id: i64, owner: i64) -> anyhow::Result<Option<Guest>>;
    async fn update_guest(&self, id: i64, owner: i64, req: &GuestUpdate)
        -> anyhow::Result<Option<Guest>>;
    async fn delete_guest(&self, id: i64, owner: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl GuestRepo for PgStore {
    async fn create_guest(&self, owner: i64, req: &GuestRequest) -> anyhow::Result<Guest> {
        let guest = sqlx::query_as::<_, Guest>(&format!(
            "INSERT INTO guests (event_id, user_id, name, email)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(req.event_id)
        .bind(owner)
        .bind(&req.name)
        .bind(&req.email)
        .fetch_one(&self.pool)
        .await
        .context("insert guest")?;
        Ok(guest)
    }

    async fn list_guests_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Guest>> {
        let rows = sqlx::query_as::<_, Guest>(&format!(
            "SELECT {COLUMNS} FROM guests WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list guests")?;
        Ok(rows)
    }

    async fn list_guests_for_event(
        &self,
        event_id: i64,
        owner: i64,
    ) -> anyhow::Result<Vec<Guest>> {
        let rows = sqlx::query_as::<_, Guest>(&format!(
            "SELECT {COLUMNS} FROM guests WHERE event_id = $1 AND user_id = $2 ORDER BY id"
        ))
        .bind(event_id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list guests for event")?;
        Ok(rows)
    }

    async fn find_guest(&self, id: i64, owner: i64) -> anyhow::Result<Option<Guest>> {
        let row = sqlx::query_as::<_, Guest>(&format!(
            "SELECT {COLUMNS} FROM guests WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .context("find guest")?;
        Ok(row)
    }

    async fn update_guest(
        &self,
        id: i64,
        owner: i64,
        req: &GuestUpdate,
    ) -> anyhow::Result<Option<Guest>> {
        let row = sqlx::query_as::<_, Guest>(&format!(
            "UPDATE guests SET name = $3, email = $4
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&req.name)
        .bind(&req.email)
        .fetch_optional(&self.pool)
        .await
        .context("update guest")?;
        Ok(row)
    }

    async fn delete_guest(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM guests WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .context("delete guest")?;
        Ok(res.rows_affected() > 0)
    }
}
