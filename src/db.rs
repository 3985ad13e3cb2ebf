use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{
    auth::repo::UserRepo,
    config::DatabaseConfig,
    events::repo::EventRepo,
    expenses::repo::ExpenseRepo,
    guests::repo::GuestRepo,
    ownership::{OwnershipRepo, Resource},
    tasks::repo::TaskRepo,
};

/// Everything the handlers need from persistence.
pub trait Store:
    UserRepo + EventRepo + GuestRepo + ExpenseRepo + TaskRepo + OwnershipRepo + Send + Sync
{
}

impl<T> Store for T where
    T: UserRepo + EventRepo + GuestRepo + ExpenseRepo + TaskRepo + OwnershipRepo + Send + Sync
{
}

/// Postgres-backed [`Store`]; a cheap clone around the shared pool.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options()?)
        .await
        .context("connect to database")?;
    info!("database pool initialized");
    Ok(pool)
}

#[async_trait]
impl OwnershipRepo for PgStore {
    async fn is_owned_by(&self, resource: Resource, id: i64, owner: i64) -> anyhow::Result<bool> {
        // Table names come from a closed enum, never from the request.
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND user_id = $2)",
            resource.table()
        );
        let owned: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(owner)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("ownership lookup on {}", resource.table()))?;
        Ok(owned)
    }
}
