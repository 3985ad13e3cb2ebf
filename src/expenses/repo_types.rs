use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub description: String,
    /// Serialized as a decimal string, e.g. `"120.50"`.
    pub amount: Decimal,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
