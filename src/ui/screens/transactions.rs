use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::Transaction;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("Transactions {} ({})", app.range, app.transactions.len());

    if app.transactions.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No transactions in this range",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add-expense or :add-income, or widen it with :range",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(theme::panel(title)), area);
        return;
    }

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            transaction_row(txn, 40).style(style)
        })
        .collect();

    let table = Table::new(rows, transaction_widths())
        .header(transaction_header())
        .block(theme::panel(title));

    f.render_widget(table, area);
}

/// Column layout shared with the card history table.
pub(crate) fn transaction_widths() -> [Constraint; 5] {
    [
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(14),
    ]
}

pub(crate) fn transaction_header() -> Row<'static> {
    let cells = ["Date", "Category", "Description", "Amount", "Card"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    Row::new(cells).height(1)
}

pub(crate) fn transaction_row(txn: &Transaction, desc_width: usize) -> Row<'static> {
    Row::new(vec![
        Cell::from(format_date(txn.date)),
        Cell::from(txn.category.as_str()),
        Cell::from(truncate(&txn.description, desc_width)),
        Cell::from(Span::styled(
            format_amount(txn.amount),
            Style::default().fg(theme::amount_color(txn.amount)),
        )),
        Cell::from(txn.card.as_str()),
    ])
}
