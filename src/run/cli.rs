use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::db::Database;
use crate::error::StoreError;
use crate::models::{
    parse_amount, parse_date, BudgetLimit, Card, Category, DateRange, Flow, Invoice, Transaction,
    YearMonth,
};
use crate::report;
use crate::ui::util::{format_amount, percent, progress_bar, truncate};

#[derive(Parser, Debug)]
#[command(name = "finboard")]
#[command(about = "Local personal finance tracker: transactions, card invoices and budgets")]
#[command(version)]
pub(crate) struct Cli {
    /// SQLite database file (overrides the configured path)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,

    /// Config file (default: config.toml in the user config directory)
    #[arg(long, global = true, env = "FINBOARD_CONFIG", value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Without a command the interactive dashboard starts.
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Record an income
    Income(IncomeArgs),
    /// Record an expense
    Expense(ExpenseArgs),
    /// List transactions, newest first
    List(RangeArgs),
    /// Replace a transaction; the income/expense kind is kept
    Edit(EditArgs),
    /// Delete a transaction by id
    Delete { id: i64 },
    /// Card invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Monthly budget limits
    #[command(subcommand)]
    Budget(BudgetCommand),
    /// Income, expenses and balance with per-category totals
    Summary(RangeArgs),
    /// Income vs expense for every month on record
    Evolution,
    /// Card purchase history
    Cards {
        /// Only this card
        #[arg(long, short)]
        card: Option<Card>,
    },
    /// Write transactions to a CSV file
    Export {
        path: String,
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Args, Debug)]
pub(crate) struct IncomeArgs {
    /// YYYY-MM-DD or "today"
    #[arg(value_parser = date_arg)]
    date: NaiveDate,
    category: Category,
    #[arg(value_parser = amount_arg)]
    amount: Decimal,
    #[arg(long, short, default_value = "")]
    description: String,
}

#[derive(Args, Debug)]
pub(crate) struct ExpenseArgs {
    /// YYYY-MM-DD or "today"
    #[arg(value_parser = date_arg)]
    date: NaiveDate,
    category: Category,
    #[arg(value_parser = amount_arg)]
    amount: Decimal,
    /// Card used; leave out for debit or cash
    #[arg(long, short, default_value = "N/A")]
    card: Card,
    #[arg(long, short, default_value = "")]
    description: String,
}

#[derive(Args, Debug)]
pub(crate) struct EditArgs {
    id: i64,
    #[arg(value_parser = date_arg)]
    date: NaiveDate,
    category: Category,
    /// Magnitude; the sign of the stored row is kept
    #[arg(value_parser = amount_arg)]
    amount: Decimal,
    /// Defaults to the current card
    #[arg(long, short)]
    card: Option<Card>,
    /// Defaults to the current description
    #[arg(long, short)]
    description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum InvoiceCommand {
    /// Record a statement total for a card and month
    Add {
        card: Card,
        period: YearMonth,
        #[arg(value_parser = amount_arg)]
        total: Decimal,
    },
    /// Invoice totals per month and card
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum BudgetCommand {
    /// Set (or replace) the monthly limit for a category
    Set {
        category: Category,
        #[arg(value_parser = amount_arg)]
        limit: Decimal,
    },
    /// Spend against each limit for the current month
    List {
        /// Measure the month of this day, from the 1st through it
        #[arg(long, value_parser = date_arg)]
        as_of: Option<NaiveDate>,
    },
}

/// Date filter. Defaults to the first of the current month through today.
#[derive(Args, Debug, Default)]
pub(crate) struct RangeArgs {
    #[arg(long, value_parser = date_arg)]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = date_arg)]
    to: Option<NaiveDate>,
    /// A whole month (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "to", "all"])]
    month: Option<YearMonth>,
    /// Every transaction on record
    #[arg(long, conflicts_with_all = ["from", "to"])]
    all: bool,
}

impl RangeArgs {
    fn resolve(&self, today: NaiveDate) -> Result<Option<DateRange>> {
        if self.all {
            return Ok(None);
        }
        if let Some(month) = self.month {
            return Ok(Some(DateRange::month(month)));
        }
        let default = DateRange::month_to_date(today);
        let range = DateRange::new(
            self.from.unwrap_or(default.start),
            self.to.unwrap_or(default.end),
        )?;
        Ok(Some(range))
    }
}

fn date_arg(s: &str) -> Result<NaiveDate, StoreError> {
    if s.eq_ignore_ascii_case("today") || s.eq_ignore_ascii_case("hoje") {
        return Ok(chrono::Local::now().date_naive());
    }
    parse_date(s)
}

fn amount_arg(s: &str) -> Result<Decimal, StoreError> {
    parse_amount(s)
}

pub(crate) fn as_cli(command: Command, db: &Database) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(command, db, today, &mut out)
}

/// Execute one subcommand, writing the human-readable result to `out`.
pub(crate) fn run(command: Command, db: &Database, today: NaiveDate, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Income(args) => {
            let txn = Transaction::income(args.date, args.category, args.description, args.amount)?;
            cli_create(db, &txn, out)
        }
        Command::Expense(args) => {
            let txn = Transaction::expense(
                args.date,
                args.category,
                args.description,
                args.amount,
                args.card,
            )?;
            cli_create(db, &txn, out)
        }
        Command::List(range) => cli_list(db, range.resolve(today)?, out),
        Command::Edit(args) => cli_edit(db, args, out),
        Command::Delete { id } => {
            db.delete_transaction(id)?;
            info!(id, "transaction deleted");
            writeln!(out, "Deleted transaction {id}")?;
            Ok(())
        }
        Command::Invoice(InvoiceCommand::Add { card, period, total }) => {
            let invoice = Invoice::new(card, period, total)?;
            let id = db.create_invoice(&invoice)?;
            writeln!(
                out,
                "Saved invoice {id}: {card} {period} {}",
                format_amount(total)
            )?;
            Ok(())
        }
        Command::Invoice(InvoiceCommand::List) => cli_invoices(db, out),
        Command::Budget(BudgetCommand::Set { category, limit }) => {
            let budget = BudgetLimit::new(category, limit)?;
            db.upsert_budget(&budget)?;
            writeln!(
                out,
                "Budget for {category} set to {} per month",
                format_amount(limit)
            )?;
            Ok(())
        }
        Command::Budget(BudgetCommand::List { as_of }) => {
            cli_budgets(db, as_of.unwrap_or(today), out)
        }
        Command::Summary(range) => cli_summary(db, range.resolve(today)?, out),
        Command::Evolution => cli_evolution(db, out),
        Command::Cards { card } => cli_cards(db, card, out),
        Command::Export { path, range } => {
            let path = shellexpand(&path);
            let range = range.resolve(today)?;
            let count = db.export_to_csv(&path, range.as_ref())?;
            if count == 0 {
                writeln!(out, "No transactions to export")?;
            } else {
                writeln!(out, "Exported {count} transactions to {}", path.display())?;
            }
            Ok(())
        }
    }
}

fn cli_create(db: &Database, txn: &Transaction, out: &mut impl Write) -> Result<()> {
    let id = db.create_transaction(txn)?;
    info!(id, flow = %txn.flow(), "transaction created");
    writeln!(
        out,
        "Saved {} {id}: {} {} {}",
        txn.flow().as_str().to_lowercase(),
        txn.date,
        txn.category,
        format_amount(txn.amount)
    )?;
    Ok(())
}

fn cli_edit(db: &Database, args: EditArgs, out: &mut impl Write) -> Result<()> {
    let existing = db
        .get_transaction(args.id)?
        .ok_or(StoreError::NotFound {
            entity: "transaction",
            id: args.id,
        })?;
    let txn = Transaction::replacing(
        &existing,
        args.date,
        args.category,
        args.description.unwrap_or_else(|| existing.description.clone()),
        args.amount,
        args.card.unwrap_or(existing.card),
    )?;
    db.update_transaction(args.id, &txn)
        .with_context(|| format!("Failed to update transaction {}", args.id))?;
    info!(id = args.id, "transaction updated");
    writeln!(out, "Updated transaction {}", args.id)?;
    Ok(())
}

fn range_label(range: Option<&DateRange>) -> String {
    range.map_or_else(|| "all time".to_string(), DateRange::to_string)
}

fn cli_list(db: &Database, range: Option<DateRange>, out: &mut impl Write) -> Result<()> {
    let txns = db.read_transactions(range.as_ref())?;
    writeln!(out, "Transactions, {}", range_label(range.as_ref()))?;
    writeln!(out, "{}", "─".repeat(78))?;
    if txns.is_empty() {
        writeln!(out, "  (none)")?;
        return Ok(());
    }
    for txn in &txns {
        write_txn_line(txn, out)?;
    }
    Ok(())
}

fn write_txn_line(txn: &Transaction, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "  {:>5}  {}  {:<14} {:>16}  {:<12} {}",
        txn.id.unwrap_or_default(),
        txn.date,
        txn.category.as_str(),
        format_amount(txn.amount),
        txn.card.as_str(),
        truncate(&txn.description, 30)
    )?;
    Ok(())
}

fn cli_summary(db: &Database, range: Option<DateRange>, out: &mut impl Write) -> Result<()> {
    let txns = db.read_transactions(range.as_ref())?;
    let summary = report::period_summary(&txns);

    writeln!(out, "finboard: {}", range_label(range.as_ref()))?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Income:     {}", format_amount(summary.income))?;
    writeln!(out, "  Expenses:   {}", format_amount(summary.expense))?;
    writeln!(out, "  Balance:    {}", format_amount(summary.balance))?;
    writeln!(out, "  Txns:       {}", txns.len())?;

    for flow in [Flow::Expense, Flow::Income] {
        let rows = report::category_breakdown(&txns, flow);
        if rows.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{flow} by Category:")?;
        for row in &rows {
            writeln!(
                out,
                "  {:<24} {}",
                row.category.as_str(),
                format_amount(row.total)
            )?;
        }
    }
    Ok(())
}

fn cli_evolution(db: &Database, out: &mut impl Write) -> Result<()> {
    let months = report::monthly_evolution(&db.read_transactions(None)?);
    writeln!(out, "{:<9} {:>16} {:>16} {:>16}", "Month", "Income", "Expense", "Net")?;
    writeln!(out, "{}", "─".repeat(60))?;
    for month in &months {
        writeln!(
            out,
            "{:<9} {:>16} {:>16} {:>16}",
            month.period.to_string(),
            format_amount(month.income),
            format_amount(month.expense),
            format_amount(month.income - month.expense)
        )?;
    }
    if months.is_empty() {
        writeln!(out, "  (no transactions)")?;
    }
    Ok(())
}

fn cli_invoices(db: &Database, out: &mut impl Write) -> Result<()> {
    let periods = report::invoice_comparison(&db.read_invoices()?);
    if periods.is_empty() {
        writeln!(out, "No invoices recorded")?;
        return Ok(());
    }
    for period in &periods {
        writeln!(out, "{}  total {}", period.period, format_amount(period.total))?;
        for (card, total) in &period.cards {
            writeln!(out, "  {:<14} {:>16}", card.as_str(), format_amount(*total))?;
        }
    }
    Ok(())
}

fn cli_budgets(db: &Database, as_of: NaiveDate, out: &mut impl Write) -> Result<()> {
    let mut budgets = report::budget_progress(&db.read_budgets()?, &db.read_transactions(None)?, as_of);
    if budgets.is_empty() {
        writeln!(out, "No budgets set. Use: finboard budget set <category> <limit>")?;
        return Ok(());
    }
    budgets.sort_by(|a, b| a.category.cmp(&b.category));

    writeln!(
        out,
        "Budgets for {} (through {as_of})",
        YearMonth::from_date(as_of)
    )?;
    writeln!(out, "{}", "─".repeat(78))?;
    for budget in &budgets {
        let flag = if budget.remaining < Decimal::ZERO {
            "  OVER"
        } else {
            ""
        };
        writeln!(
            out,
            "  {:<14} {:>14} / {:<14} {} {:>4}{flag}",
            budget.category.as_str(),
            format_amount(budget.spent),
            format_amount(budget.limit),
            progress_bar(budget.progress, 20),
            percent(budget.progress)
        )?;
    }
    Ok(())
}

fn cli_cards(db: &Database, card: Option<Card>, out: &mut impl Write) -> Result<()> {
    let spend = report::card_spend(&db.read_transactions(None)?, card);
    if spend.cards_used.is_empty() {
        writeln!(out, "No card purchases recorded")?;
        return Ok(());
    }
    let used: Vec<&str> = spend.cards_used.iter().map(Card::as_str).collect();
    writeln!(out, "Cards used: {}", used.join(", "))?;
    writeln!(out, "{}", "─".repeat(78))?;
    for txn in &spend.transactions {
        write_txn_line(txn, out)?;
    }
    writeln!(
        out,
        "  {} purchases, {}",
        spend.transactions.len(),
        format_amount(spend.total())
    )?;
    Ok(())
}

pub(crate) fn home_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~/`.
pub(crate) fn shellexpand(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
