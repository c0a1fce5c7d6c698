#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal) -> Transaction {
    Transaction {
        id: None,
        date: date("2024-01-15"),
        category: Category::Other,
        description: "Test".into(),
        amount,
        card: Card::None,
    }
}

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00));
    assert!(txn.is_income());
    assert!(!txn.is_expense());
    assert_eq!(txn.flow(), Flow::Income);
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(-50.00));
    assert!(!txn.is_income());
    assert!(txn.is_expense());
    assert_eq!(txn.flow(), Flow::Expense);
}

#[test]
fn test_abs_amount() {
    assert_eq!(make_txn(dec!(-42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(dec!(42.99)).abs_amount(), dec!(42.99));
}

#[test]
fn test_expense_constructor_negates() {
    let txn = Transaction::expense(
        date("2024-03-05"),
        Category::Food,
        "Mercado".into(),
        dec!(150.00),
        Card::Nubank,
    )
    .unwrap();
    assert_eq!(txn.amount, dec!(-150.00));
    assert_eq!(txn.card, Card::Nubank);
    assert!(txn.id.is_none());
}

#[test]
fn test_income_constructor_uses_no_card() {
    let txn = Transaction::income(date("2024-03-01"), Category::Salary, String::new(), dec!(3000))
        .unwrap();
    assert_eq!(txn.amount, dec!(3000));
    assert_eq!(txn.card, Card::None);
}

#[test]
fn test_zero_amount_rejected() {
    let err = Transaction::from_signed(
        date("2024-03-01"),
        Category::Other,
        String::new(),
        Decimal::ZERO,
        Card::None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("zero"));
}

#[test]
fn test_category_must_match_flow() {
    assert!(Transaction::expense(
        date("2024-03-01"),
        Category::Salary,
        String::new(),
        dec!(10),
        Card::None,
    )
    .is_err());
    assert!(Transaction::income(date("2024-03-01"), Category::Food, String::new(), dec!(10))
        .is_err());
    // Outros is valid on both sides
    assert!(Transaction::income(date("2024-03-01"), Category::Other, String::new(), dec!(10))
        .is_ok());
    assert!(Transaction::expense(
        date("2024-03-01"),
        Category::Other,
        String::new(),
        dec!(10),
        Card::C6,
    )
    .is_ok());
}

#[test]
fn test_income_with_card_rejected() {
    assert!(Transaction::from_signed(
        date("2024-03-01"),
        Category::Salary,
        String::new(),
        dec!(10),
        Card::Nubank,
    )
    .is_err());
}

#[test]
fn test_description_trimmed() {
    let txn = Transaction::income(
        date("2024-03-01"),
        Category::Gift,
        "  bday  ".into(),
        dec!(50),
    )
    .unwrap();
    assert_eq!(txn.description, "bday");
}

#[test]
fn test_counted_expense_skips_invoice_category() {
    let mut txn = make_txn(dec!(-500));
    txn.category = Category::CardInvoice;
    assert!(txn.is_expense());
    assert!(!txn.is_counted_expense());

    txn.category = Category::Food;
    assert!(txn.is_counted_expense());
}

#[test]
fn test_flow_signed() {
    assert_eq!(Flow::Income.signed(dec!(-5)), dec!(5));
    assert_eq!(Flow::Expense.signed(dec!(5)), dec!(-5));
    assert_eq!(Flow::of(Decimal::ZERO), None);
}

#[test]
fn test_replacing_keeps_flow_and_id() {
    let mut existing = Transaction::expense(
        date("2024-03-05"),
        Category::Food,
        "Mercado".into(),
        dec!(150),
        Card::Nubank,
    )
    .unwrap();
    existing.id = Some(7);

    let edited = Transaction::replacing(
        &existing,
        date("2024-03-06"),
        Category::Transport,
        "Uber".into(),
        dec!(32.50),
        Card::C6,
    )
    .unwrap();
    assert_eq!(edited.id, Some(7));
    assert_eq!(edited.amount, dec!(-32.50));
    assert_eq!(edited.card, Card::C6);

    // An expense cannot be turned into an income category
    assert!(Transaction::replacing(
        &existing,
        date("2024-03-06"),
        Category::Salary,
        String::new(),
        dec!(10),
        Card::None,
    )
    .is_err());
}

#[test]
fn test_replacing_income_drops_card() {
    let existing =
        Transaction::income(date("2024-03-01"), Category::Salary, String::new(), dec!(3000))
            .unwrap();
    let edited = Transaction::replacing(
        &existing,
        date("2024-03-01"),
        Category::Freelance,
        "Projeto".into(),
        dec!(1200),
        Card::Nubank,
    )
    .unwrap();
    assert_eq!(edited.amount, dec!(1200));
    assert_eq!(edited.card, Card::None);
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(Category::parse("Salário"), Some(Category::Salary));
    assert_eq!(Category::parse("salario"), Some(Category::Salary));
    assert_eq!(Category::parse("ALIMENTAÇÃO"), Some(Category::Food));
    assert_eq!(Category::parse("alimentacao"), Some(Category::Food));
    assert_eq!(Category::parse("Fatura Cartão"), Some(Category::CardInvoice));
    assert_eq!(Category::parse("fatura"), Some(Category::CardInvoice));
    assert_eq!(Category::parse("unknown"), None);
    assert!("nope".parse::<Category>().is_err());
}

#[test]
fn test_category_roundtrip() {
    for cat in Category::income().iter().chain(Category::expense()) {
        assert_eq!(Category::parse(cat.as_str()), Some(*cat), "{cat}");
    }
}

#[test]
fn test_category_sets() {
    assert_eq!(Category::income().len(), 7);
    assert_eq!(Category::expense().len(), 8);
    assert!(!Category::budgetable().contains(&Category::CardInvoice));
    assert!(Category::budgetable()
        .iter()
        .all(|c| Category::expense().contains(c)));
    assert!(Category::Caju.accepts(Flow::Income));
    assert!(!Category::Caju.accepts(Flow::Expense));
}

// ── Card ──────────────────────────────────────────────────────

#[test]
fn test_card_parse() {
    assert_eq!(Card::parse("N/A"), Some(Card::None));
    assert_eq!(Card::parse(LEGACY_NO_CARD), Some(Card::None));
    assert_eq!(Card::parse("nubank"), Some(Card::Nubank));
    assert_eq!(Card::parse("Mercado Pago"), Some(Card::MercadoPago));
    assert_eq!(Card::parse("Outro"), Some(Card::Other));
    assert_eq!(Card::parse("Amex"), None);
}

#[test]
fn test_unknown_card_lists_choices() {
    let err = "Amex".parse::<Card>().unwrap_err().to_string();
    assert!(err.contains("unknown card 'Amex'"));
    assert!(err.contains("N/A, Nubank"));
    assert!(err.contains("Caju"));
}

#[test]
fn test_card_roundtrip() {
    for card in Card::all() {
        assert_eq!(Card::parse(card.as_str()), Some(*card), "{card}");
    }
}

#[test]
fn test_card_credit() {
    assert!(!Card::None.is_credit());
    assert!(!Card::Caju.is_credit());
    assert!(Card::Caju.is_card());
    assert!(Card::Nubank.is_credit());
    assert_eq!(Card::credit().len(), 6);
    assert!(Card::credit().iter().all(|c| c.is_credit()));
}

// ── YearMonth / DateRange ─────────────────────────────────────

#[test]
fn test_year_month_parse_and_display() {
    let ym: YearMonth = "2024-03".parse().unwrap();
    assert_eq!(ym.year(), 2024);
    assert_eq!(ym.month(), 3);
    assert_eq!(ym.to_string(), "2024-03");
    assert_eq!("2024-3".parse::<YearMonth>().unwrap(), ym);
    assert!("2024-13".parse::<YearMonth>().is_err());
    assert!("24-03".parse::<YearMonth>().is_err());
    assert!("2024/03".parse::<YearMonth>().is_err());
}

#[test]
fn test_year_month_ordering() {
    let a: YearMonth = "2023-12".parse().unwrap();
    let b: YearMonth = "2024-01".parse().unwrap();
    let c: YearMonth = "2024-02".parse().unwrap();
    assert!(a < b && b < c);
    assert_eq!(a.next(), b);
    assert_eq!(c.prev(), b);
}

#[test]
fn test_year_month_bounds() {
    let feb: YearMonth = "2024-02".parse().unwrap();
    assert_eq!(feb.first_day(), date("2024-02-01"));
    assert_eq!(feb.last_day(), date("2024-02-29"));
    assert!(feb.contains(date("2024-02-15")));
    assert!(!feb.contains(date("2024-03-01")));
}

#[test]
fn test_date_range() {
    let range = DateRange::new(date("2024-03-01"), date("2024-03-31")).unwrap();
    assert!(range.contains(date("2024-03-01")));
    assert!(range.contains(date("2024-03-31")));
    assert!(!range.contains(date("2024-04-01")));
    assert!(DateRange::new(date("2024-03-31"), date("2024-03-01")).is_err());

    let mtd = DateRange::month_to_date(date("2024-03-17"));
    assert_eq!(mtd.start, date("2024-03-01"));
    assert_eq!(mtd.end, date("2024-03-17"));
}

#[test]
fn test_parse_date_rejects_other_formats() {
    assert!(parse_date("01/03/2024").is_err());
    assert!(parse_date("2024-02-30").is_err());
}

// ── Invoice / BudgetLimit ─────────────────────────────────────

#[test]
fn test_invoice_new() {
    let period: YearMonth = "2024-03".parse().unwrap();
    let inv = Invoice::new(Card::Nubank, period, dec!(1234.56)).unwrap();
    assert!(inv.id.is_none());
    assert_eq!(inv.total, dec!(1234.56));

    assert!(Invoice::new(Card::None, period, dec!(1)).is_err());
    assert!(Invoice::new(Card::Caju, period, dec!(1)).is_err());
    assert!(Invoice::new(Card::C6, period, dec!(-1)).is_err());
    assert!(Invoice::new(Card::C6, period, Decimal::ZERO).is_ok());
}

#[test]
fn test_budget_new() {
    let b = BudgetLimit::new(Category::Food, dec!(500)).unwrap();
    assert_eq!(b.limit, dec!(500));
    assert!(BudgetLimit::new(Category::CardInvoice, dec!(500)).is_err());
    assert!(BudgetLimit::new(Category::Salary, dec!(500)).is_err());
    assert!(BudgetLimit::new(Category::Food, Decimal::ZERO).is_err());
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_formats() {
    assert_eq!(parse_amount("150.50").unwrap(), dec!(150.50));
    assert_eq!(parse_amount("150,50").unwrap(), dec!(150.50));
    assert_eq!(parse_amount("R$ 3000").unwrap(), dec!(3000));
    assert_eq!(parse_amount(" 0 ").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_amount_rejects_garbage_and_negatives() {
    assert!(parse_amount("abc").is_err());
    assert!(parse_amount("").is_err());
    assert!(parse_amount("-10").is_err());
}

#[test]
fn test_parse_amount_bounds() {
    assert_eq!(parse_amount("1000000000000").unwrap(), MAX_AMOUNT);
    assert_eq!(parse_amount("150,500").unwrap(), dec!(150.5));
    assert!(parse_amount("1000000000000.01").is_err());
    assert!(parse_amount("79228162514264337593543950335").is_err());
    assert!(parse_amount("0.0000000000000000000000000001").is_err());
    assert!(parse_amount("12.345").is_err());
}

#[test]
fn test_constructors_reject_unbounded_amounts() {
    let day = parse_date("2024-03-10").unwrap();
    let tiny = Decimal::new(1, 28);
    assert!(Transaction::income(day, Category::Salary, String::new(), Decimal::MAX).is_err());
    assert!(Transaction::expense(day, Category::Food, String::new(), tiny, Card::None).is_err());
    assert!(BudgetLimit::new(Category::Food, tiny).is_err());
    assert!(BudgetLimit::new(Category::Food, MAX_AMOUNT + Decimal::ONE).is_err());
    let period = "2024-03".parse().unwrap();
    assert!(Invoice::new(Card::Nubank, period, Decimal::MAX).is_err());
    assert!(check_amount(dec!(-150.25)).is_ok());
}
