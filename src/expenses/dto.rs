use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;

/// Amounts are accepted as JSON numbers or decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRequest {
    pub event_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseUpdate {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

const AMOUNT_SCALE: u32 = 2;
/// Ten integer digits: `NUMERIC(12, 2)` tops out at 9999999999.99.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

fn clean(
    description: &str,
    amount: Decimal,
    category: &str,
) -> Result<(String, Decimal, String), AppError> {
    let description = description.trim().to_string();
    let category = category.trim().to_string();
    if description.is_empty() {
        return Err(AppError::validation("Expense description is required"));
    }
    if category.is_empty() {
        return Err(AppError::validation("Expense category is required"));
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::validation("Amount must not be negative"));
    }
    // Column is NUMERIC(12, 2).
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(AppError::validation("Amount has more than two decimal places"));
    }
    if amount >= AMOUNT_LIMIT {
        return Err(AppError::validation("Amount is too large"));
    }
    Ok((description, amount, category))
}

impl ExpenseRequest {
    pub fn validate(self) -> Result<Self, AppError> {
        let (description, amount, category) =
            clean(&self.description, self.amount, &self.category)?;
        Ok(Self {
            description,
            amount,
            category,
            ..self
        })
    }
}

impl ExpenseUpdate {
    pub fn validate(self) -> Result<Self, AppError> {
        let (description, amount, category) =
            clean(&self.description, self.amount, &self.category)?;
        Ok(Self {
            description,
            amount,
            category,
        })
    }
}
