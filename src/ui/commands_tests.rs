#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use super::commands::handle_command;
use crate::db::Database;
use crate::models::{parse_date, Card, Category, Flow};

fn setup() -> (App, Database) {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new(parse_date("2024-03-15").unwrap());
    app.refresh(&db).unwrap();
    (app, db)
}

fn run(input: &str, app: &mut App, db: &Database) {
    handle_command(input, app, db);
}

// ── Entry ─────────────────────────────────────────────────────

#[test]
fn test_add_expense_and_income() {
    let (mut app, db) = setup();
    run("add-income 2024-03-01; Salário; 3000; Empresa", &mut app, &db);
    run("add-expense 2024-03-05; Alimentação; 150,00; Nubank; Mercado", &mut app, &db);

    assert_eq!(app.transactions.len(), 2);
    assert_eq!(app.summary.income, dec!(3000));
    assert_eq!(app.summary.expense, dec!(-150));
    assert_eq!(app.summary.balance, dec!(2850));

    let expense = &app.transactions[0];
    assert_eq!(expense.category, Category::Food);
    assert_eq!(expense.card, Card::Nubank);
    assert_eq!(expense.description, "Mercado");
    assert!(app.status_message.starts_with("Expense saved"));
}

#[test]
fn test_add_accepts_today() {
    let (mut app, db) = setup();
    run("add-expense today; Lazer; 40; Nenhum", &mut app, &db);
    assert_eq!(app.transactions.len(), 1);
    assert_eq!(app.transactions[0].date, app.today);
    assert_eq!(app.transactions[0].card, Card::None);
}

#[test]
fn test_add_outside_range_is_reported() {
    let (mut app, db) = setup();
    run("add-expense 2024-01-10; Lazer; 40; C6", &mut app, &db);
    assert!(app.transactions.is_empty());
    assert_eq!(app.transaction_count, 1);
    assert!(app.status_message.contains("outside the current range"));
}

#[test]
fn test_add_rejects_wrong_category_for_flow() {
    let (mut app, db) = setup();
    run("add-expense 2024-03-05; Salário; 10; Nubank", &mut app, &db);
    assert_eq!(app.transaction_count, 0);
    assert!(app.status_message.starts_with("Error:"));
    assert!(app.status_message.contains("Alimentação"));
}

#[test]
fn test_add_rejects_zero_and_missing_fields() {
    let (mut app, db) = setup();
    run("add-income 2024-03-01; Salário; 0", &mut app, &db);
    assert!(app.status_message.contains("zero"));

    run("add-expense 2024-03-01; Lazer; 10", &mut app, &db);
    assert!(app.status_message.starts_with("Error: Expected"));
    assert_eq!(app.transaction_count, 0);
}

// ── Edit / delete ─────────────────────────────────────────────

#[test]
fn test_edit_replaces_selected_row() {
    let (mut app, db) = setup();
    run("add-expense 2024-03-05; Alimentação; 150; Nubank; Mercado", &mut app, &db);
    run("t", &mut app, &db);
    run("edit 2024-03-06; Transporte; 32.50; C6; Uber", &mut app, &db);

    assert_eq!(app.transactions.len(), 1);
    let txn = &app.transactions[0];
    assert_eq!(txn.category, Category::Transport);
    assert_eq!(txn.amount, dec!(-32.50));
    assert_eq!(txn.card, Card::C6);
    assert_eq!(txn.flow(), Flow::Expense);
    assert!(app.status_message.starts_with("Updated transaction"));
}

#[test]
fn test_edit_income_keeps_flow_and_is_stored() {
    let (mut app, db) = setup();
    run("add-income 2024-03-01; Salário; 3000; Empresa", &mut app, &db);
    run("t", &mut app, &db);
    let id = app.transactions[0].id.unwrap();

    run("edit 2024-03-02; Freelance; 1.250,00", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));

    run("edit 2024-03-02; Freelance; 1250; Projeto", &mut app, &db);
    assert_eq!(app.status_message, format!("Updated transaction {id}"));

    let stored = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(stored.amount, dec!(1250));
    assert_eq!(stored.category, Category::Freelance);
    assert_eq!(stored.description, "Projeto");
    assert_eq!(stored.card, Card::None);
    assert_eq!(stored.flow(), Flow::Income);
    assert_eq!(app.summary.income, dec!(1250));
}

#[test]
fn test_edit_requires_transactions_screen() {
    let (mut app, db) = setup();
    run("add-income 2024-03-01; Salário; 3000", &mut app, &db);
    run("edit 2024-03-01; Freelance; 10", &mut app, &db);
    assert!(app.status_message.contains("Navigate to Transactions"));
    assert_eq!(app.transactions[0].category, Category::Salary);
}

#[test]
fn test_delete_asks_for_confirmation() {
    let (mut app, db) = setup();
    run("add-expense 2024-03-05; Lazer; 60; Nenhum; Cinema", &mut app, &db);
    run("transactions", &mut app, &db);
    run("delete-txn", &mut app, &db);

    assert_eq!(app.input_mode, InputMode::Confirm);
    let id = app.transactions[0].id.unwrap();
    assert_eq!(
        app.pending_action,
        Some(PendingAction::DeleteTransaction {
            id,
            description: "Cinema".into()
        })
    );
    // Nothing is deleted until confirmed
    assert_eq!(db.transaction_count().unwrap(), 1);
}

// ── Invoices, budgets, cards ──────────────────────────────────

#[test]
fn test_invoice_command() {
    let (mut app, db) = setup();
    run("invoice Nubank; 2024-03; 1200", &mut app, &db);
    assert_eq!(app.screen, Screen::Cards);
    assert_eq!(app.invoice_periods.len(), 1);
    assert_eq!(app.invoice_periods[0].total, dec!(1200));

    run("invoice Caju; 2024-03; 10", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));
    run("invoice Nubank; março; 10", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(db.read_invoices().unwrap().len(), 1);
}

#[test]
fn test_budget_command_upserts() {
    let (mut app, db) = setup();
    run("budget Alimentação 500", &mut app, &db);
    run("budget alimentacao 650", &mut app, &db);
    assert_eq!(app.screen, Screen::Budgets);
    assert_eq!(app.budgets.len(), 1);
    assert_eq!(app.budgets[0].limit, dec!(650));

    run("budget Fatura Cartão 100", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));
    run("budget Lazer -5", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(db.read_budgets().unwrap().len(), 1);
}

#[test]
fn test_card_filter_command() {
    let (mut app, db) = setup();
    run("add-expense 2024-03-05; Lazer; 60; Nubank", &mut app, &db);
    run("add-expense 2024-03-06; Compras; 90; Azul", &mut app, &db);

    run("card Azul", &mut app, &db);
    assert_eq!(app.card_filter, Some(Card::Azul));
    assert_eq!(app.card_spend.transactions.len(), 1);

    run("card", &mut app, &db);
    assert_eq!(app.card_filter, None);
    assert_eq!(app.card_spend.transactions.len(), 2);

    run("card N/A", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(app.card_filter, None);
}

// ── Range ─────────────────────────────────────────────────────

#[test]
fn test_month_and_range_commands() {
    let (mut app, db) = setup();
    run("month 2024-02", &mut app, &db);
    assert_eq!(app.range.start, parse_date("2024-02-01").unwrap());
    assert_eq!(app.range.end, parse_date("2024-02-29").unwrap());

    run("m 1", &mut app, &db);
    assert_eq!(app.range.start, parse_date("2024-01-01").unwrap());

    run("range 2024-03-01 2024-03-10", &mut app, &db);
    assert_eq!(app.range.end, parse_date("2024-03-10").unwrap());

    // Reversed bounds leave the range untouched
    run("range 2024-03-10 2024-03-01", &mut app, &db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(app.range.start, parse_date("2024-03-01").unwrap());

    run("this-month", &mut app, &db);
    assert_eq!(app.range.end, app.today);
}

#[test]
fn test_next_and_prev_month() {
    let (mut app, db) = setup();
    run("prev-month", &mut app, &db);
    assert_eq!(app.range.start, parse_date("2024-02-01").unwrap());
    run("next-month", &mut app, &db);
    run("next-month", &mut app, &db);
    assert_eq!(app.range.start, parse_date("2024-04-01").unwrap());
    assert_eq!(app.range.end, parse_date("2024-04-30").unwrap());
}

// ── Misc ──────────────────────────────────────────────────────

#[test]
fn test_unknown_command_suggests() {
    let (mut app, db) = setup();
    run("dashbord", &mut app, &db);
    assert_eq!(
        app.status_message,
        "Unknown command: :dashbord. Did you mean :dashboard?"
    );
}

#[test]
fn test_navigation_and_quit() {
    let (mut app, db) = setup();
    run("c", &mut app, &db);
    assert_eq!(app.screen, Screen::Cards);
    run("budgets", &mut app, &db);
    assert_eq!(app.screen, Screen::Budgets);
    run("help", &mut app, &db);
    assert!(app.show_help);
    run("q", &mut app, &db);
    assert!(!app.running);
}

#[test]
fn test_export_command() {
    let (mut app, db) = setup();
    run("add-expense 2024-03-05; Lazer; 60; Nubank", &mut app, &db);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    run(&format!("export {}", path.display()), &mut app, &db);

    assert!(app.status_message.starts_with("Exported 1 transactions"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
}
