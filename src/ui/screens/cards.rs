use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::transactions::{transaction_header, transaction_row, transaction_widths};
use crate::models::Card;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let invoice_height = (app.invoice_periods.len() as u16 + 3)
        .min(area.height / 2)
        .max(5);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(invoice_height), Constraint::Min(5)])
        .split(area);

    render_invoices(f, chunks[0], app);
    render_history(f, chunks[1], app);
}

/// One row per month, one column per card that ever had an invoice.
fn render_invoices(f: &mut Frame, area: Rect, app: &App) {
    let title = "Invoices by Month";
    if app.invoice_periods.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No invoices yet. Record one with :invoice <card>; <YYYY-MM>; <total>",
            theme::dim_style(),
        )))
        .centered()
        .block(theme::panel(title));
        f.render_widget(msg, area);
        return;
    }

    let mut cards: Vec<Card> = app
        .invoice_periods
        .iter()
        .flat_map(|p| p.cards.iter().map(|(card, _)| *card))
        .collect();
    cards.sort();
    cards.dedup();

    let header = Row::new(
        std::iter::once("Month".to_string())
            .chain(cards.iter().map(|c| c.to_string()))
            .chain(std::iter::once("Total".to_string()))
            .map(|h| Cell::from(h).style(theme::header_style())),
    );

    // Newest months on top
    let rows: Vec<Row> = app
        .invoice_periods
        .iter()
        .rev()
        .take(area.height.saturating_sub(3) as usize)
        .enumerate()
        .map(|(i, period)| {
            let mut cells = vec![Cell::from(period.period.to_string())];
            for card in &cards {
                let total = period
                    .cards
                    .iter()
                    .find(|(c, _)| c == card)
                    .map(|(_, total)| *total);
                cells.push(match total {
                    Some(total) => Cell::from(format_amount(total)),
                    None => Cell::from(Span::styled("-", theme::dim_style())),
                });
            }
            cells.push(Cell::from(Span::styled(
                format_amount(period.total),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(9))
        .chain(cards.iter().map(|_| Constraint::Length(15)))
        .chain(std::iter::once(Constraint::Length(16)))
        .collect();

    let table = Table::new(rows, widths).header(header).block(theme::panel(title));
    f.render_widget(table, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    let spend = &app.card_spend;
    let filter = app
        .card_filter
        .map_or_else(|| "all cards".to_string(), |c| c.to_string());
    let title = format!(
        "Card Spending: {filter} ({} / {})",
        spend.transactions.len(),
        format_amount(spend.total())
    );

    if spend.transactions.is_empty() {
        let hint = if spend.cards_used.is_empty() {
            "No card purchases recorded. Add one with :add-expense".to_string()
        } else {
            let used: Vec<&str> = spend.cards_used.iter().map(Card::as_str).collect();
            format!("No purchases for this card. Cards used: {}", used.join(", "))
        };
        let msg = Paragraph::new(Line::from(Span::styled(hint, theme::dim_style())))
            .centered()
            .block(theme::panel(title));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = spend
        .transactions
        .iter()
        .enumerate()
        .skip(app.card_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let style = if i == app.card_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            transaction_row(txn, 32).style(style)
        })
        .collect();

    let table = Table::new(rows, transaction_widths())
        .header(transaction_header())
        .block(theme::panel(title));
    f.render_widget(table, area);
}

/// Sum of every invoice on record, for the status line.
pub(crate) fn invoice_grand_total(app: &App) -> Decimal {
    app.invoice_periods.iter().map(|p| p.total).sum()
}
