use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};

use super::{Card, Category, YearMonth};

/// Direction of money. Stored as the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Income,
    Expense,
}

impl Flow {
    /// `None` for a zero amount, which is neither.
    pub fn of(amount: Decimal) -> Option<Self> {
        if amount > Decimal::ZERO {
            Some(Self::Income)
        } else if amount < Decimal::ZERO {
            Some(Self::Expense)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Apply this flow's sign to an unsigned amount.
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            Self::Income => magnitude.abs(),
            Self::Expense => -magnitude.abs(),
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    /// Positive for income, negative for expense.
    pub amount: Decimal,
    pub card: Card,
}

impl Transaction {
    pub fn income(
        date: NaiveDate,
        category: Category,
        description: String,
        amount: Decimal,
    ) -> StoreResult<Self> {
        Self::new(Flow::Income, date, category, description, amount, Card::None)
    }

    pub fn expense(
        date: NaiveDate,
        category: Category,
        description: String,
        amount: Decimal,
        card: Card,
    ) -> StoreResult<Self> {
        Self::new(Flow::Expense, date, category, description, amount, card)
    }

    /// Build a transaction from an unsigned amount; the flow decides the sign.
    pub fn new(
        flow: Flow,
        date: NaiveDate,
        category: Category,
        description: String,
        amount: Decimal,
        card: Card,
    ) -> StoreResult<Self> {
        Self::from_signed(date, category, description, flow.signed(amount), card)
    }

    /// Build a transaction using the storage sign convention.
    pub fn from_signed(
        date: NaiveDate,
        category: Category,
        description: String,
        amount: Decimal,
        card: Card,
    ) -> StoreResult<Self> {
        let flow = Flow::of(amount)
            .ok_or_else(|| StoreError::invalid("amount must not be zero"))?;
        check_amount(amount)?;
        if !category.accepts(flow) {
            return Err(StoreError::invalid(format!(
                "'{category}' is not an {} category",
                flow.as_str().to_lowercase()
            )));
        }
        if flow == Flow::Income && card.is_card() {
            return Err(StoreError::invalid("income cannot be paid with a card"));
        }
        Ok(Self {
            id: None,
            date,
            category,
            description: description.trim().to_string(),
            amount,
            card,
        })
    }

    /// A full replacement for `existing` that keeps its flow. `amount` is a
    /// magnitude; income never carries a card.
    pub fn replacing(
        existing: &Transaction,
        date: NaiveDate,
        category: Category,
        description: String,
        amount: Decimal,
        card: Card,
    ) -> StoreResult<Self> {
        let flow = existing.flow();
        let card = match flow {
            Flow::Income => Card::None,
            Flow::Expense => card,
        };
        let mut txn = Self::new(flow, date, category, description, amount, card)?;
        txn.id = existing.id;
        Ok(txn)
    }

    /// Rows loaded from storage always carry a non-zero amount; a zero that
    /// slipped in through another writer is reported as an expense.
    pub fn flow(&self) -> Flow {
        Flow::of(self.amount).unwrap_or(Flow::Expense)
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Expense that counts towards spending totals. Card invoice payments are
    /// excluded since the itemized card spend is already recorded.
    pub fn is_counted_expense(&self) -> bool {
        self.is_expense() && !self.category.is_invoice()
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    pub fn period(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}

/// Largest magnitude accepted for a single amount, limit or invoice total.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Amounts are whole cents no larger than [`MAX_AMOUNT`], so sums over any
/// realistic history stay far from `Decimal::MAX`.
pub fn check_amount(amount: Decimal) -> StoreResult<Decimal> {
    if amount.abs() > MAX_AMOUNT {
        return Err(StoreError::invalid(format!(
            "amount {amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    if amount.normalize().scale() > 2 {
        return Err(StoreError::invalid(format!(
            "amount {amount} has more than 2 decimal places"
        )));
    }
    Ok(amount)
}

/// Parse a user-entered amount. Accepts `1234.56`, `1234,56` and an optional
/// `R$` prefix. Negative input is rejected; the flow decides the sign.
pub fn parse_amount(s: &str) -> StoreResult<Decimal> {
    let bad = || StoreError::invalid(format!("invalid amount '{s}'"));
    let cleaned = s.trim().trim_start_matches("R$").trim().replace(',', ".");
    let amount = Decimal::from_str(&cleaned).map_err(|_| bad())?;
    if amount < Decimal::ZERO {
        return Err(StoreError::invalid(format!("amount must not be negative: {s}")));
    }
    check_amount(amount)
}
