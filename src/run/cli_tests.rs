#![allow(clippy::unwrap_used)]

use clap::Parser;
use rust_decimal_macros::dec;

use super::*;

fn today() -> NaiveDate {
    parse_date("2024-03-15").unwrap()
}

fn exec(db: &Database, argv: &[&str]) -> Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("finboard").chain(argv.iter().copied()))?;
    let command = cli.command.context("no subcommand")?;
    let mut out = Vec::new();
    run(command, db, today(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn seeded() -> Database {
    let db = Database::open_in_memory().unwrap();
    exec(&db, &["income", "2024-03-01", "Salário", "3000", "-d", "Empresa"]).unwrap();
    exec(&db, &["expense", "2024-03-05", "Alimentação", "150", "--card", "Nubank"]).unwrap();
    exec(&db, &["expense", "2024-03-06", "Fatura Cartão", "500", "-c", "Nubank"]).unwrap();
    exec(&db, &["expense", "2024-02-10", "Lazer", "80,50", "-c", "C6"]).unwrap();
    db
}

// ── Parsing ───────────────────────────────────────────────────

#[test]
fn test_no_subcommand_launches_tui() {
    let cli = Cli::try_parse_from(["finboard", "--db", "/tmp/x.db"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
}

#[test]
fn test_bad_values_rejected_by_parser() {
    assert!(Cli::try_parse_from(["finboard", "income", "15/03/2024", "Salário", "10"]).is_err());
    assert!(Cli::try_parse_from(["finboard", "income", "2024-03-15", "Aluguel", "10"]).is_err());
    assert!(Cli::try_parse_from(["finboard", "expense", "2024-03-15", "Lazer", "abc"]).is_err());
    assert!(Cli::try_parse_from(["finboard", "invoice", "add", "Nubank", "2024-13", "10"]).is_err());
}

#[test]
fn test_month_conflicts_with_from() {
    let parsed = Cli::try_parse_from([
        "finboard", "list", "--month", "2024-03", "--from", "2024-03-01",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_range_resolution() {
    let args = RangeArgs::default();
    let range = args.resolve(today()).unwrap().unwrap();
    assert_eq!(range.start, parse_date("2024-03-01").unwrap());
    assert_eq!(range.end, today());

    let all = RangeArgs {
        all: true,
        ..RangeArgs::default()
    };
    assert!(all.resolve(today()).unwrap().is_none());

    let reversed = RangeArgs {
        from: Some(parse_date("2024-03-20").unwrap()),
        ..RangeArgs::default()
    };
    assert!(reversed.resolve(today()).is_err());
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_income_and_expense_stored_with_sign() {
    let db = seeded();
    let txns = db.read_transactions(None).unwrap();
    assert_eq!(txns.len(), 4);
    let food = txns.iter().find(|t| t.category == Category::Food).unwrap();
    assert_eq!(food.amount, dec!(-150));
    assert_eq!(food.card, Card::Nubank);
    let salary = txns.iter().find(|t| t.category == Category::Salary).unwrap();
    assert_eq!(salary.card, Card::None);
    assert_eq!(salary.description, "Empresa");
}

#[test]
fn test_expense_with_income_category_fails() {
    let db = Database::open_in_memory().unwrap();
    let err = exec(&db, &["expense", "2024-03-05", "Salário", "10"]).unwrap_err();
    assert!(err.to_string().contains("not an expense category"));
    assert_eq!(db.transaction_count().unwrap(), 0);
}

#[test]
fn test_list_defaults_to_month_to_date() {
    let db = seeded();
    let out = exec(&db, &["list"]).unwrap();
    assert!(out.starts_with("Transactions, 2024-03-01 → 2024-03-15"));
    assert_eq!(out.lines().count(), 2 + 3);
    assert!(!out.contains("Lazer"));

    let all = exec(&db, &["list", "--all"]).unwrap();
    assert!(all.contains("Lazer"));
    assert!(all.contains("-R$ 80.50"));
}

#[test]
fn test_edit_keeps_flow_and_defaults() {
    let db = seeded();
    let food = db
        .read_transactions(None)
        .unwrap()
        .into_iter()
        .find(|t| t.category == Category::Food)
        .unwrap();
    let id = food.id.unwrap().to_string();

    let out = exec(&db, &["edit", &id, "2024-03-07", "Transporte", "42"]).unwrap();
    assert_eq!(out.trim(), format!("Updated transaction {id}"));

    let edited = db.get_transaction(food.id.unwrap()).unwrap().unwrap();
    assert_eq!(edited.amount, dec!(-42));
    assert_eq!(edited.category, Category::Transport);
    // Card was not given, so it stays
    assert_eq!(edited.card, Card::Nubank);
}

#[test]
fn test_edit_and_delete_missing_id() {
    let db = seeded();
    let err = exec(&db, &["edit", "999", "2024-03-07", "Lazer", "1"]).unwrap_err();
    assert!(err.downcast_ref::<StoreError>().unwrap().is_not_found());

    let err = exec(&db, &["delete", "999"]).unwrap_err();
    assert!(err.downcast_ref::<StoreError>().unwrap().is_not_found());
    assert_eq!(db.transaction_count().unwrap(), 4);
}

#[test]
fn test_delete() {
    let db = seeded();
    let id = db.read_transactions(None).unwrap()[0].id.unwrap();
    let out = exec(&db, &["delete", &id.to_string()]).unwrap();
    assert_eq!(out.trim(), format!("Deleted transaction {id}"));
    assert!(db.get_transaction(id).unwrap().is_none());
}

// ── Reports ───────────────────────────────────────────────────

#[test]
fn test_summary_excludes_invoice_category() {
    let db = seeded();
    let out = exec(&db, &["summary"]).unwrap();
    assert!(out.contains("Income:     R$ 3,000.00"));
    assert!(out.contains("Expenses:   -R$ 150.00"));
    assert!(out.contains("Balance:    R$ 2,850.00"));
    assert!(out.contains("Expense by Category:"));
    assert!(!out.contains("Fatura Cartão"));
}

#[test]
fn test_summary_for_month() {
    let db = seeded();
    let out = exec(&db, &["summary", "--month", "2024-02"]).unwrap();
    assert!(out.contains("2024-02-01 → 2024-02-29"));
    assert!(out.contains("Expenses:   -R$ 80.50"));
    assert!(!out.contains("Income by Category"));
}

#[test]
fn test_evolution_lists_every_month() {
    let db = seeded();
    let out = exec(&db, &["evolution"]).unwrap();
    let rows: Vec<&str> = out.lines().skip(2).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("2024-02"));
    assert!(rows[0].contains("R$ 0.00"));
    assert!(rows[1].starts_with("2024-03"));
}

#[test]
fn test_invoices_add_and_list() {
    let db = Database::open_in_memory().unwrap();
    exec(&db, &["invoice", "add", "Nubank", "2024-03", "1200"]).unwrap();
    exec(&db, &["invoice", "add", "Nubank", "2024-03", "50"]).unwrap();
    exec(&db, &["invoice", "add", "C6", "2024-02", "300"]).unwrap();
    assert!(exec(&db, &["invoice", "add", "Caju", "2024-02", "10"]).is_err());

    let out = exec(&db, &["invoice", "list"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("2024-02  total R$ 300.00"));
    assert!(lines[2].starts_with("2024-03  total R$ 1,250.00"));
}

#[test]
fn test_budget_set_and_list() {
    let db = seeded();
    exec(&db, &["budget", "set", "Alimentação", "500"]).unwrap();
    assert!(exec(&db, &["budget", "set", "Fatura Cartão", "100"]).is_err());

    let out = exec(&db, &["budget", "list"]).unwrap();
    assert!(out.contains("Budgets for 2024-03"));
    assert!(out.contains("R$ 150.00"));
    assert!(out.contains("30%"));
    assert!(!out.contains("OVER"));

    // Looking at February, nothing was spent on food
    let feb = exec(&db, &["budget", "list", "--as-of", "2024-02-28"]).unwrap();
    assert!(feb.contains("0%"));
}

#[test]
fn test_cards_history_and_filter() {
    let db = seeded();
    let out = exec(&db, &["cards"]).unwrap();
    assert!(out.starts_with("Cards used: Nubank, C6"));
    assert!(out.contains("3 purchases"));

    let c6 = exec(&db, &["cards", "--card", "C6"]).unwrap();
    assert!(c6.contains("1 purchases, R$ 80.50"));
}

#[test]
fn test_export_writes_csv() {
    let db = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("march.csv");
    let out = exec(&db, &["export", path.to_str().unwrap()]).unwrap();
    assert!(out.starts_with("Exported 3 transactions"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_shellexpand() {
    assert_eq!(shellexpand("/tmp/a.csv"), PathBuf::from("/tmp/a.csv"));
    assert_eq!(shellexpand("~/a.csv"), home_dir().join("a.csv"));
}
