//! Row-level ownership checks shared by every mutating handler.
//!
//! Callers never learn whether a row is missing or belongs to someone else:
//! both come back as [`AppError::NotFoundOrForbidden`].

use async_trait::async_trait;
use tracing::warn;

use crate::{auth::extractors::AuthUser, db::Store, error::AppError};

/// Kinds of user-owned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Event,
    Guest,
    Expense,
    Task,
}

impl Resource {
    pub fn table(self) -> &'static str {
        match self {
            Resource::Event => "events",
            Resource::Guest => "guests",
            Resource::Expense => "expenses",
            Resource::Task => "tasks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Event => "Event",
            Resource::Guest => "Guest",
            Resource::Expense => "Expense",
            Resource::Task => "Task",
        }
    }
}

#[async_trait]
pub trait OwnershipRepo {
    /// True when row `id` of `resource` exists and its `user_id` is `owner`.
    async fn is_owned_by(&self, resource: Resource, id: i64, owner: i64) -> anyhow::Result<bool>;
}

/// Re-reads `(id, owner)` before a write is attempted.
pub async fn ensure_owner(
    store: &dyn Store,
    user: &AuthUser,
    resource: Resource,
    id: i64,
) -> Result<(), AppError> {
    if store.is_owned_by(resource, id, user.id).await? {
        Ok(())
    } else {
        warn!(user_id = user.id, id, resource = resource.table(), "ownership check failed");
        Err(AppError::NotFoundOrForbidden(resource))
    }
}

/// Turns an owner-filtered lookup or write result into a response value.
pub fn owned<T>(resource: Resource, row: Option<T>) -> Result<T, AppError> {
    row.ok_or(AppError::NotFoundOrForbidden(resource))
}

/// Same as [`owned`] for statements that only report whether a row matched.
pub fn affected(resource: Resource, matched: bool) -> Result<(), AppError> {
    if matched {
        Ok(())
    } else {
        Err(AppError::NotFoundOrForbidden(resource))
    }
}
