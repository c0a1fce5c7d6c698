use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount in reais with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"R$ 1,234,567.89"`, `-42.5` → `"-R$ 42.50"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let formatted = format!("{:.2}", val.abs().round_dp(2));
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}R$ {with_commas}.{dec_part}")
}

/// Dates are stored ISO but shown day-first.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is at most `max` characters (counting "…" as one).
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max - 1).collect();
    format!("{truncated}…")
}

/// A text gauge such as `[█████░░░░░]`. `ratio` is clamped to `[0, 1]`.
pub(crate) fn progress_bar(ratio: Decimal, width: usize) -> String {
    let ratio = ratio.clamp(Decimal::ZERO, Decimal::ONE);
    let filled = (ratio * Decimal::from(width))
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Whole percentage, rounded half away from zero.
pub(crate) fn percent(ratio: Decimal) -> String {
    let whole = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{whole}%")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Pull a cursor back inside a list that shrank.
pub(crate) fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
