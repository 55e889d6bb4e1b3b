use engine::{Currency, Money};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Creates a styled span for a money amount.
#[must_use]
pub fn styled_amount(amount: i64, currency: Currency, theme: &Theme) -> Span<'static> {
    let formatted = Money::new(amount).format(currency);
    Span::styled(formatted, Style::default().fg(theme.text))
}

/// Creates a styled span with bold modifier for emphasis (e.g., the grand total).
#[must_use]
pub fn styled_amount_bold(amount: i64, currency: Currency, theme: &Theme) -> Span<'static> {
    let formatted = Money::new(amount).format(currency);
    Span::styled(
        formatted,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
}

/// Color for an allocation total: short of 100% is a warning, exactly 100%
/// is good, over 100% is an error.
#[must_use]
pub fn allocation_color(total_percentage: u32, theme: &Theme) -> Color {
    if total_percentage < 100 {
        theme.warning
    } else if total_percentage == 100 {
        theme.positive
    } else {
        theme.error
    }
}

/// Creates a text-based allocation bar for inline use.
///
/// Returns a string like `████████░░ 80%`. The fill caps at the bar width;
/// over-allocation shows a full bar with the real percentage.
#[must_use]
pub fn allocation_bar(total_percentage: u32, width: usize) -> String {
    let filled = (total_percentage.min(100) as usize * width) / 100;
    let empty = width.saturating_sub(filled);

    format!(
        "{}{} {}%",
        "█".repeat(filled),
        "░".repeat(empty),
        total_percentage
    )
}

/// Creates a styled allocation bar colored by completeness.
#[must_use]
pub fn styled_allocation_bar(
    total_percentage: u32,
    width: usize,
    theme: &Theme,
) -> Span<'static> {
    let bar = allocation_bar(total_percentage, width);
    let color = allocation_color(total_percentage, theme);
    Span::styled(bar, Style::default().fg(color))
}
