use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use tracing::{info, warn};

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::format_amount;
use crate::db::Database;
use crate::models::{
    parse_amount, parse_date, BudgetLimit, Card, Category, DateRange, Flow, Invoice, Transaction,
    YearMonth,
};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit finboard", cmd_quit, r);
    register_command!("quit", "Quit finboard", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("c", "Go to Cards", cmd_cards, r);
    register_command!("cards", "Go to Cards", cmd_cards, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "range",
        "Filter by dates (e.g. :range 2024-01-01 2024-03-31)",
        cmd_range,
        r
    );
    register_command!("this-month", "First of this month through today", cmd_this_month, r);
    register_command!("month", "Show a whole month (e.g. :month 2024-03)", cmd_month, r);
    register_command!("m", "Show a whole month (e.g. :m 2024-03)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "add-income",
        "Add income (date; category; amount[; description])",
        cmd_add_income,
        r
    );
    register_command!(
        "add-expense",
        "Add expense (date; category; amount; card[; description])",
        cmd_add_expense,
        r
    );
    register_command!(
        "edit",
        "Replace selected transaction (same fields as add)",
        cmd_edit,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!(
        "invoice",
        "Record card invoice (card; YYYY-MM; total)",
        cmd_invoice,
        r
    );
    register_command!(
        "budget",
        "Set monthly limit (e.g. :budget Alimentação 500)",
        cmd_budget,
        r
    );
    register_command!(
        "card",
        "Filter card history (e.g. :card Nubank, :card to clear)",
        cmd_card,
        r
    );
    register_command!(
        "export",
        "Export range to CSV (e.g. :export ~/gastos.csv)",
        cmd_export,
        r
    );

    r
});

/// Run one `:` command line. Failures end up in the status bar; nothing here
/// stops the TUI.
pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) {
    let trimmed = input.trim();
    let (cmd_name, args) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args = args.trim();

    if cmd_name.is_empty() {
        return;
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, db) {
            let message = format!("{e:#}");
            warn!(command = cmd_name, error = %message, "command failed");
            app.set_status(format!("Error: {message}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Argument parsing ─────────────────────────────────────────

/// Entry commands take `;`-separated fields since categories contain spaces.
fn fields(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    args.split(';').map(str::trim).collect()
}

fn entry_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    if s.eq_ignore_ascii_case("today") || s.eq_ignore_ascii_case("hoje") {
        return Ok(today);
    }
    Ok(parse_date(s)?)
}

fn category_for(s: &str, flow: Flow) -> anyhow::Result<Category> {
    let category: Category = s.parse()?;
    if !category.accepts(flow) {
        let options: Vec<&str> = Category::of(flow).iter().map(Category::as_str).collect();
        bail!(
            "'{category}' is not an {} category. Options: {}",
            flow.as_str().to_lowercase(),
            options.join(", ")
        );
    }
    Ok(category)
}

/// Parse the add/edit fields for `flow` into an unsaved transaction.
fn entry(args: &str, flow: Flow, today: NaiveDate) -> anyhow::Result<Transaction> {
    let f = fields(args);
    match flow {
        Flow::Income => {
            if !(3..=4).contains(&f.len()) {
                bail!("Expected: date; category; amount[; description]");
            }
            Ok(Transaction::income(
                entry_date(f[0], today)?,
                category_for(f[1], flow)?,
                f.get(3).copied().unwrap_or_default().to_string(),
                parse_amount(f[2])?,
            )?)
        }
        Flow::Expense => {
            if !(4..=5).contains(&f.len()) {
                bail!("Expected: date; category; amount; card[; description]");
            }
            Ok(Transaction::expense(
                entry_date(f[0], today)?,
                category_for(f[1], flow)?,
                f.get(4).copied().unwrap_or_default().to_string(),
                parse_amount(f[2])?,
                f[3].parse()?,
            )?)
        }
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh(db)
}

fn cmd_transactions(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh(db)
}

fn cmd_cards(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Cards;
    app.refresh(db)
}

fn cmd_budgets(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    app.refresh(db)
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [from, to] = parts.as_slice() else {
        bail!("Usage: :range <YYYY-MM-DD> <YYYY-MM-DD>");
    };
    let range = DateRange::new(entry_date(from, app.today)?, entry_date(to, app.today)?)?;
    app.set_range(range, db)?;
    app.set_status(format!("Showing {range}"));
    Ok(())
}

fn cmd_this_month(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let range = DateRange::month_to_date(app.today);
    app.set_range(range, db)?;
    app.set_status(format!("Showing {range}"));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        return cmd_this_month(args, app, db);
    }

    // A bare month number keeps the year currently shown
    let period: YearMonth = if args.len() <= 2 {
        let year = YearMonth::from_date(app.range.start).year();
        format!("{year}-{args}").parse()?
    } else {
        args.parse()?
    };
    app.set_range(DateRange::month(period), db)?;
    app.set_status(format!("Switched to month: {period}"));
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.shift_month(true, db)?;
    app.set_status(format!("Showing {}", app.range));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.shift_month(false, db)?;
    app.set_status(format!("Showing {}", app.range));
    Ok(())
}

fn cmd_add_income(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    add(args, Flow::Income, app, db)
}

fn cmd_add_expense(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    add(args, Flow::Expense, app, db)
}

fn add(args: &str, flow: Flow, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let txn = entry(args, flow, app.today)?;
    let id = db.create_transaction(&txn)?;
    info!(id, %flow, "transaction added from tui");
    app.refresh(db)?;

    let outside = if app.range.contains(txn.date) {
        ""
    } else {
        " (outside the current range)"
    };
    app.set_status(format!(
        "{flow} saved: {} {}{outside}",
        txn.category,
        format_amount(txn.amount)
    ));
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions {
        bail!("Navigate to Transactions and select one first");
    }
    let Some(existing) = app.selected_transaction().cloned() else {
        bail!("No transaction selected");
    };
    let id = existing.id.context("Selected transaction has no id")?;

    let parsed = entry(args, existing.flow(), app.today)?;
    let amount = parsed.abs_amount();
    let txn = Transaction::replacing(
        &existing,
        parsed.date,
        parsed.category,
        parsed.description,
        amount,
        parsed.card,
    )?;
    db.update_transaction(id, &txn)?;
    app.refresh(db)?;
    app.set_status(format!("Updated transaction {id}"));
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        bail!("Navigate to Transactions and select one first");
    }

    if let Some(txn) = app.selected_transaction() {
        if let Some(id) = txn.id {
            let label = if txn.description.is_empty() {
                txn.category.to_string()
            } else {
                txn.description.clone()
            };
            app.confirm_message = format!("Delete '{label}' ({})?", format_amount(txn.amount));
            app.pending_action = Some(PendingAction::DeleteTransaction {
                id,
                description: label,
            });
            app.input_mode = InputMode::Confirm;
        }
    }

    Ok(())
}

fn cmd_invoice(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let f = fields(args);
    if f.len() != 3 {
        bail!("Usage: :invoice <card>; <YYYY-MM>; <total>");
    }
    let invoice = Invoice::new(f[0].parse()?, f[1].parse()?, parse_amount(f[2])?)?;
    db.create_invoice(&invoice)?;
    app.refresh(db)?;
    app.screen = Screen::Cards;
    app.set_status(format!(
        "Invoice saved: {} {} = {}",
        invoice.card,
        invoice.period,
        format_amount(invoice.total)
    ));
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    // Last token is the amount, everything before is the category name
    let Some((category_name, amount_str)) = args.trim().rsplit_once(' ') else {
        bail!("Usage: :budget <category> <amount>. Example: :budget Alimentação 500");
    };

    let budget = BudgetLimit::new(category_name.trim().parse()?, parse_amount(amount_str)?)?;
    db.upsert_budget(&budget)?;
    app.refresh(db)?;
    app.screen = Screen::Budgets;
    app.set_status(format!(
        "Budget set: {} = {} per month",
        budget.category,
        format_amount(budget.limit)
    ));
    Ok(())
}

fn cmd_card(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let clear = ["", "all", "todos"]
        .iter()
        .any(|word| args.eq_ignore_ascii_case(word));
    let filter = if clear {
        None
    } else {
        let card: Card = args.parse()?;
        if !card.is_card() {
            bail!("'{args}' is not a card");
        }
        Some(card)
    };

    app.card_filter = filter;
    app.card_index = 0;
    app.card_scroll = 0;
    app.refresh(db)?;
    app.screen = Screen::Cards;
    app.set_status(match filter {
        Some(card) => format!("Card history: {card}"),
        None => "Card history: all cards".to_string(),
    });
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        crate::run::home_dir().join(format!(
            "finboard-export-{}-{}.csv",
            app.range.start, app.range.end
        ))
    } else {
        crate::run::shellexpand(args)
    };

    let count = db.export_to_csv(&path, Some(&app.range))?;
    if count == 0 {
        app.set_status("No transactions to export");
    } else {
        app.set_status(format!("Exported {count} transactions to {}", path.display()));
    }
    Ok(())
}
