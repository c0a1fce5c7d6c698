use rust_decimal::Decimal;

use crate::error::{StoreError, StoreResult};

use super::{check_amount, Category};

/// Monthly spending cap for one expense category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetLimit {
    pub category: Category,
    pub limit: Decimal,
}

impl BudgetLimit {
    pub fn new(category: Category, limit: Decimal) -> StoreResult<Self> {
        if !category.is_budgetable() {
            return Err(StoreError::invalid(format!(
                "'{category}' cannot have a budget"
            )));
        }
        if limit <= Decimal::ZERO {
            return Err(StoreError::invalid("budget limit must be positive"));
        }
        let limit = check_amount(limit)?;
        Ok(Self { category, limit })
    }
}
