use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::models::YearMonth;
use crate::report::BudgetProgress;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, percent, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "Budgets for {} (through {})",
        YearMonth::from_date(app.today),
        app.today.format("%d/%m")
    );

    if app.budgets.is_empty() {
        render_empty(f, area, title);
        return;
    }

    let items: Vec<ListItem> = app
        .budgets
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, budget)| budget_item(budget, i, i == app.budget_index))
        .collect();

    f.render_widget(List::new(items).block(theme::panel(title)), area);
}

fn budget_item(budget: &BudgetProgress, i: usize, is_cursor: bool) -> ListItem<'static> {
    let color = theme::progress_color(budget.progress);
    let pct_style = if budget.is_exhausted() {
        Style::default()
            .fg(color)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    };
    let name_style = if is_cursor {
        theme::selected_style()
    } else if i % 2 == 0 {
        theme::alt_row_style()
    } else {
        theme::normal_style()
    };

    let remaining = if budget.remaining < rust_decimal::Decimal::ZERO {
        format!(" over by {}", format_amount(-budget.remaining))
    } else {
        format!(" {} left", format_amount(budget.remaining))
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{:<14}", truncate(budget.category.as_str(), 13)), name_style),
        Span::styled(
            format!(
                "{:>14} / {:<14}",
                format_amount(budget.spent),
                format_amount(budget.limit)
            ),
            Style::default().fg(color),
        ),
        Span::styled(progress_bar(budget.progress, 20), Style::default().fg(color)),
        Span::styled(
            format!(" {:>4}", percent(budget.progress)),
            pct_style,
        ),
        Span::styled(remaining, theme::dim_style()),
    ]))
}

fn render_empty(f: &mut Frame, area: Rect, title: String) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No budgets set", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :budget <category> <amount> to set a monthly limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(theme::panel(title));
    f.render_widget(msg, area);
}
