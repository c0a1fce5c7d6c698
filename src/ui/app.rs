use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

use crate::db::Database;
use crate::models::{Card, DateRange, Flow, Transaction, YearMonth};
use crate::report::{self, BudgetProgress, CardSpend, CategoryTotal, InvoicePeriod, MonthlyFlow, PeriodSummary};
use crate::ui::util::clamp_cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Cards,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Cards,
            Self::Budgets,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Cards => write!(f, "Cards"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// Budgets are measured against this day's month.
    pub(crate) today: NaiveDate,
    /// Filter for the dashboard and the transaction list.
    pub(crate) range: DateRange,

    // Dashboard
    pub(crate) summary: PeriodSummary,
    pub(crate) expense_breakdown: Vec<CategoryTotal>,
    pub(crate) income_breakdown: Vec<CategoryTotal>,
    pub(crate) evolution: Vec<MonthlyFlow>,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) transaction_count: i64,

    // Cards
    pub(crate) invoice_periods: Vec<InvoicePeriod>,
    pub(crate) card_spend: CardSpend,
    pub(crate) card_filter: Option<Card>,
    pub(crate) card_index: usize,
    pub(crate) card_scroll: usize,

    // Budgets
    pub(crate) budgets: Vec<BudgetProgress>,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            today,
            range: DateRange::month_to_date(today),

            summary: PeriodSummary::default(),
            expense_breakdown: Vec::new(),
            income_breakdown: Vec::new(),
            evolution: Vec::new(),

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            transaction_count: 0,

            invoice_periods: Vec::new(),
            card_spend: CardSpend::default(),
            card_filter: None,
            card_index: 0,
            card_scroll: 0,

            budgets: Vec::new(),
            budget_index: 0,
            budget_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload every screen's data from storage. Nothing is cached between
    /// calls; each figure is recomputed from the rows.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        let in_range = db.read_transactions(Some(&self.range))?;
        let all = db.read_transactions(None)?;
        debug!(range = %self.range, in_range = in_range.len(), total = all.len(), "refresh");

        self.summary = report::period_summary(&in_range);
        self.expense_breakdown = report::category_breakdown(&in_range, Flow::Expense);
        self.income_breakdown = report::category_breakdown(&in_range, Flow::Income);
        self.evolution = report::monthly_evolution(&all);

        self.invoice_periods = report::invoice_comparison(&db.read_invoices()?);
        self.card_spend = report::card_spend(&all, self.card_filter);
        self.budgets = report::budget_progress(&db.read_budgets()?, &all, self.today);
        self.budgets.sort_by(|a, b| a.category.cmp(&b.category));

        self.transactions = in_range;
        self.transaction_count = db.transaction_count()?;

        clamp_cursor(
            &mut self.transaction_index,
            &mut self.transaction_scroll,
            self.transactions.len(),
        );
        clamp_cursor(
            &mut self.card_index,
            &mut self.card_scroll,
            self.card_spend.transactions.len(),
        );
        clamp_cursor(&mut self.budget_index, &mut self.budget_scroll, self.budgets.len());
        Ok(())
    }

    pub(crate) fn set_range(&mut self, range: DateRange, db: &Database) -> Result<()> {
        self.range = range;
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.refresh(db)
    }

    /// Step the range a whole calendar month, anchored on the month the
    /// current range starts in.
    pub(crate) fn shift_month(&mut self, forward: bool, db: &Database) -> Result<()> {
        let current = YearMonth::from_date(self.range.start);
        let target = if forward { current.next() } else { current.prev() };
        self.set_range(DateRange::month(target), db)
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
