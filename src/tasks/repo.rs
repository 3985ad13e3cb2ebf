use anyhow::Context;
use async_trait::async_trait;

use super::{
    dto::{TaskRequest, TaskUpdate},
    repo_types::Task,
};
use crate::db::PgStore;

const COLUMNS: &str = "id, event_id, user_id, title, description, due_date, created_at";

#[async_trait]
pub trait TaskRepo {
    async fn create_task(&self, owner: i64, req: &TaskRequest) -> anyhow::Result<Task>;
    async fn list_tasks_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Task>>;
    async fn list_tasks_for_event(&self, event_id: i64, owner: i64) -> anyhow::Result<Vec<Task>>;
    async fn find_task(&self, id: i64, owner: i64) -> anyhow::Result<Option<Task>>;
    async fn update_task(&self, id: i64, owner: i64, req: &TaskUpdate)
        -> anyhow::Result<Option<Task>>;
    async fn delete_task(&self, id: i64, owner: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl TaskRepo for PgStore {
    async fn create_task(&self, owner: i64, req: &TaskRequest) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (event_id, user_id, title, description, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(req.event_id)
        .bind(owner)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.due_date)
        .fetch_one(&self.pool)
        .await
        .context("insert task")?;
        Ok(task)
    }

    async fn list_tasks_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE user_id = $1
             ORDER BY due_date NULLS LAST, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list tasks")?;
        Ok(rows)
    }

    async fn list_tasks_for_event(&self, event_id: i64, owner: i64) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE event_id = $1 AND user_id = $2
             ORDER BY due_date NULLS LAST, id"
        ))
        .bind(event_id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list tasks for event")?;
        Ok(rows)
    }

    async fn find_task(&self, id: i64, owner: i64) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .context("find task")?;
        Ok(row)
    }

    async fn update_task(
        &self,
        id: i64,
        owner: i64,
        req: &TaskUpdate,
    ) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = $3, description = $4, due_date = $5
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.due_date)
        .fetch_optional(&self.pool)
        .await
        .context("update task")?;
        Ok(row)
    }

    async fn delete_task(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .context("delete task")?;
        Ok(res.rows_affected() > 0)
    }
}
