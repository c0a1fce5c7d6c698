use rust_decimal::Decimal;

use crate::error::{StoreError, StoreResult};

use super::{check_amount, Card, YearMonth};

/// Statement total for one credit card and month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: Option<i64>,
    pub card: Card,
    pub period: YearMonth,
    pub total: Decimal,
}

impl Invoice {
    pub fn new(card: Card, period: YearMonth, total: Decimal) -> StoreResult<Self> {
        if !card.is_credit() {
            return Err(StoreError::invalid(format!(
                "'{card}' is not a credit card"
            )));
        }
        if total < Decimal::ZERO {
            return Err(StoreError::invalid("invoice total cannot be negative"));
        }
        let total = check_amount(total)?;
        Ok(Self {
            id: None,
            card,
            period,
            total,
        })
    }
}
