use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::report::CategoryTotal;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

/// Months shown in the evolution chart.
const EVOLUTION_MONTHS: usize = 12;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(8),    // Category charts
            Constraint::Length(12), // Monthly evolution
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_breakdown(f, halves[0], "Expenses by Category", &app.expense_breakdown, theme::RED);
    render_breakdown(f, halves[1], "Income by Category", &app.income_breakdown, theme::GREEN);

    render_evolution(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = &app.summary;
    render_card(f, cards[0], "Income", format_amount(summary.income), theme::GREEN);
    render_card(f, cards[1], "Expenses", format_amount(summary.expense), theme::RED);
    render_card(
        f,
        cards[2],
        "Balance",
        format_amount(summary.balance),
        theme::amount_color(summary.balance),
    );
    render_card(
        f,
        cards[3],
        "Transactions",
        app.transactions.len().to_string(),
        theme::ACCENT,
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(theme::panel(title));

    f.render_widget(text, area);
}

fn render_breakdown(f: &mut Frame, area: Rect, title: &str, rows: &[CategoryTotal], color: Color) {
    if rows.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing in this range",
            theme::dim_style(),
        )))
        .centered()
        .block(theme::panel(title));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(chart_value(row.total))
                .text_value(format_amount(row.total))
                .label(Line::from(truncate(row.category.as_str(), 13)))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme::HEADER_BG).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(theme::panel(title))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}

fn render_evolution(f: &mut Frame, area: Rect, app: &App) {
    let title = "Monthly Evolution (income vs expense)";
    if app.evolution.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions recorded yet",
            theme::dim_style(),
        )))
        .centered()
        .block(theme::panel(title));
        f.render_widget(msg, area);
        return;
    }

    let recent = &app.evolution[app.evolution.len().saturating_sub(EVOLUTION_MONTHS)..];
    let groups: Vec<(String, [Bar; 2])> = recent
        .iter()
        .map(|month| {
            (
                month.period.to_string(),
                [
                    Bar::default()
                        .value(chart_value(month.income))
                        .text_value(String::new())
                        .style(Style::default().fg(theme::GREEN)),
                    Bar::default()
                        .value(chart_value(month.expense))
                        .text_value(String::new())
                        .style(Style::default().fg(theme::RED)),
                ],
            )
        })
        .collect();

    let mut chart = BarChart::default()
        .block(theme::panel(title))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);
    for (label, bars) in &groups {
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(label.as_str()).centered())
                .bars(bars),
        );
    }

    f.render_widget(chart, area);
}

/// Bar heights are whole reais; fractions don't change the picture.
fn chart_value(amount: Decimal) -> u64 {
    amount.abs().round().to_u64().unwrap_or(0)
}
