use anyhow::Context;
use async_trait::async_trait;

use super::{
    dto::{ExpenseRequest, ExpenseUpdate},
    repo_types::Expense,
};
use crate::db::PgStore;

const COLUMNS: &str = "id, event_id, user_id, description, amount, category, created_at";

#[async_trait]
pub trait ExpenseRepo {
    async fn create_expense(&self, owner: i64, req: &ExpenseRequest) -> anyhow::Result<Expense>;
    async fn list_expenses_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Expense>>;
    async fn list_expenses_for_event(
        &self,
        event_id: i64,
        owner: i64,
    ) -> anyhow::Result<Vec<Expense>>;
    async fn find_expense(&self, id: i64, owner: i64) -> anyhow::Result<Option<Expense>>;
    async fn update_expense(
        &self,
        id: i64,
        owner: i64,
        req: &ExpenseUpdate,
    ) -> anyhow::Result<Option<Expense>>;
    async fn delete_expense(&self, id: i64, owner: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl ExpenseRepo for PgStore {
    async fn create_expense(&self, owner: i64, req: &ExpenseRequest) -> anyhow::Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "INSERT INTO expenses (event_id, user_id, description, amount, category)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(req.event_id)
        .bind(owner)
        .bind(&req.description)
        .bind(req.amount)
        .bind(&req.category)
        .fetch_one(&self.pool)
        .await
        .context("insert expense")?;
        Ok(expense)
    }

    async fn list_expenses_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list expenses")?;
        Ok(rows)
    }

    async fn list_expenses_for_event(
        &self,
        event_id: i64,
        owner: i64,
    ) -> anyhow::Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE event_id = $1 AND user_id = $2 ORDER BY id"
        ))
        .bind(event_id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list expenses for event")?;
        Ok(rows)
    }

    async fn find_expense(&self, id: i64, owner: i64) -> anyhow::Result<Option<Expense>> {
        let row = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .context("find expense")?;
        Ok(row)
    }

    async fn update_expense(
        &self,
        id: i64,
        owner: i64,
        req: &ExpenseUpdate,
    ) -> anyhow::Result<Option<Expense>> {
        let row = sqlx::query_as::<_, Expense>(&format!(
            "UPDATE expenses SET description = $3, amount = $4, category = $5
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&req.description)
        .bind(req.amount)
        .bind(&req.category)
        .fetch_optional(&self.pool)
        .await
        .context("update expense")?;
        Ok(row)
    }

    async fn delete_expense(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .context("delete expense")?;
        Ok(res.rows_affected() > 0)
    }
}
