//! Aggregations over transaction, invoice and budget records.
//!
//! Everything here is a pure function of its inputs. Card invoice payments
//! ("Fatura Cartão") never count as expenses: the itemized card purchases are
//! already recorded, so counting the bill too would double the spend.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::{BudgetLimit, Card, Category, DateRange, Flow, Invoice, Transaction, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PeriodSummary {
    pub(crate) income: Decimal,
    /// Zero or negative.
    pub(crate) expense: Decimal,
    pub(crate) balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: Category,
    /// Always non-negative, for both flows.
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthlyFlow {
    pub(crate) period: YearMonth,
    pub(crate) income: Decimal,
    /// Absolute value.
    pub(crate) expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetProgress {
    pub(crate) category: Category,
    pub(crate) limit: Decimal,
    pub(crate) spent: Decimal,
    /// Negative once the budget is exceeded.
    pub(crate) remaining: Decimal,
    /// `spent / limit`, clamped to `[0, 1]`.
    pub(crate) progress: Decimal,
}

impl BudgetProgress {
    pub(crate) fn is_exhausted(&self) -> bool {
        self.progress >= Decimal::ONE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvoicePeriod {
    pub(crate) period: YearMonth,
    /// One entry per card, ordered by card.
    pub(crate) cards: Vec<(Card, Decimal)>,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct CardSpend {
    /// Every card with at least one expense, regardless of the filter.
    pub(crate) cards_used: Vec<Card>,
    pub(crate) transactions: Vec<Transaction>,
}

impl CardSpend {
    pub(crate) fn total(&self) -> Decimal {
        self.transactions.iter().map(Transaction::abs_amount).sum()
    }
}

/// Income, expense and net balance of `txns`.
pub(crate) fn period_summary(txns: &[Transaction]) -> PeriodSummary {
    let income: Decimal = txns
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let expense: Decimal = txns
        .iter()
        .filter(|t| t.is_counted_expense())
        .map(|t| t.amount)
        .sum();
    PeriodSummary {
        income,
        expense,
        balance: income + expense,
    }
}

/// Totals per category for one flow, largest first. Categories without
/// transactions are left out.
pub(crate) fn category_breakdown(txns: &[Transaction], flow: Flow) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, Decimal> = HashMap::new();
    for txn in txns {
        let counts = match flow {
            Flow::Income => txn.is_income(),
            Flow::Expense => txn.is_counted_expense(),
        };
        if counts {
            *totals.entry(txn.category).or_default() += txn.abs_amount();
        }
    }

    let mut rows: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    rows
}

/// Income and expense per calendar month, oldest first. A month with only
/// one side still appears, with the other side at zero.
pub(crate) fn monthly_evolution(txns: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut buckets: BTreeMap<YearMonth, (Decimal, Decimal)> = BTreeMap::new();
    for txn in txns {
        if txn.is_income() {
            buckets.entry(txn.period()).or_default().0 += txn.amount;
        } else if txn.is_counted_expense() {
            buckets.entry(txn.period()).or_default().1 += txn.abs_amount();
        }
    }

    buckets
        .into_iter()
        .map(|(period, (income, expense))| MonthlyFlow {
            period,
            income,
            expense,
        })
        .collect()
}

/// Spend against each budget for the month of `as_of`, counting
/// transactions from the first of that month through `as_of`.
///
/// A limit that is zero or negative reports full progress as soon as
/// anything is spent.
pub(crate) fn budget_progress(
    budgets: &[BudgetLimit],
    txns: &[Transaction],
    as_of: NaiveDate,
) -> Vec<BudgetProgress> {
    let month = DateRange::month_to_date(as_of);
    let mut spent_by_category: HashMap<Category, Decimal> = HashMap::new();
    for txn in txns
        .iter()
        .filter(|t| t.is_counted_expense() && month.contains(t.date))
    {
        *spent_by_category.entry(txn.category).or_default() += txn.abs_amount();
    }

    budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .get(&budget.category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let progress = if budget.limit > Decimal::ZERO {
                // Overflow only happens when spent dwarfs the limit.
                spent
                    .checked_div(budget.limit)
                    .map_or(Decimal::ONE, |r| r.clamp(Decimal::ZERO, Decimal::ONE))
            } else if spent > Decimal::ZERO {
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
            BudgetProgress {
                category: budget.category,
                limit: budget.limit,
                spent,
                remaining: budget.limit - spent,
                progress,
            }
        })
        .collect()
}

/// Invoice totals per month and card, oldest month first. Repeated entries
/// for the same card and month are added together.
pub(crate) fn invoice_comparison(invoices: &[Invoice]) -> Vec<InvoicePeriod> {
    let mut periods: BTreeMap<YearMonth, BTreeMap<Card, Decimal>> = BTreeMap::new();
    for invoice in invoices {
        *periods
            .entry(invoice.period)
            .or_default()
            .entry(invoice.card)
            .or_default() += invoice.total;
    }

    periods
        .into_iter()
        .map(|(period, cards)| {
            let total = cards.values().copied().sum();
            InvoicePeriod {
                period,
                cards: cards.into_iter().collect(),
                total,
            }
        })
        .collect()
}

/// Expenses paid with a card, newest first, optionally narrowed to `card`.
pub(crate) fn card_spend(txns: &[Transaction], card: Option<Card>) -> CardSpend {
    let mut spend: Vec<Transaction> = txns
        .iter()
        .filter(|t| t.is_expense() && t.card.is_card())
        .cloned()
        .collect();

    let mut cards_used: Vec<Card> = spend.iter().map(|t| t.card).collect();
    cards_used.sort();
    cards_used.dedup();

    if let Some(card) = card {
        spend.retain(|t| t.card == card);
    }
    spend.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

    CardSpend {
        cards_used,
        transactions: spend,
    }
}
