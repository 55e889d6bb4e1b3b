pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::AppState;

use components::hints::{KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    render_shell(frame, area, state);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar (label + underline)
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    // Content area (no top border needed, tabs provide visual separation)
    let content_inner = layout[2];

    match state.section {
        crate::app::Section::Schedule => screens::schedule::render(frame, content_inner, state),
        crate::app::Section::Profiles => screens::profiles::render(frame, content_inner, state),
        crate::app::Section::Totals => screens::totals::render(frame, content_inner, state),
        crate::app::Section::Bank => screens::bank::render(frame, content_inner, state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let currency = state.plan.currency();
    let total = state.pricing.grand_total().format(currency);
    let profile = state
        .plan
        .profile()
        .map(|link| link.name.clone())
        .unwrap_or_else(|| "-".to_string());
    let status = if state.connection_ok { "OK" } else { "ERR" };
    let status_style = if state.connection_ok {
        Style::default().fg(theme.positive)
    } else {
        Style::default().fg(theme.error)
    };

    let line = Line::from(vec![
        Span::styled("Plan", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.plan.title)),
        Span::styled("Currency", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", currency.code())),
        Span::styled("Total", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {total}  ")),
        Span::styled("Profile", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {profile}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    // Global shortcuts (always shown, compact)
    let mut parts = components::tabs::tab_shortcuts(theme);

    // Context-specific hints based on section and mode
    let context_hints = get_context_hints(state);
    if !context_hints.is_empty() {
        parts.push(hint_separator(theme));
        parts.extend(hints_to_spans(&context_hints, theme));
    }

    // Quit hint at the end
    parts.push(hint_separator(theme));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    let bar = Paragraph::new(Line::from(parts));
    frame.render_widget(bar, area);
}

/// Returns context-specific keyboard hints based on current section and mode.
fn get_context_hints(state: &AppState) -> Vec<KeyHint> {
    match state.section {
        crate::app::Section::Schedule => match state.schedule.mode {
            crate::app::ScheduleMode::List => vec![
                KeyHint::new("a", "add"),
                KeyHint::new("e", "edit"),
                KeyHint::new("d", "delete"),
                KeyHint::new("+/-", "percent"),
                KeyHint::new("c", "clear"),
                KeyHint::new("x", "export"),
            ],
            crate::app::ScheduleMode::Edit => vec![
                KeyHint::new("t", "due type"),
                KeyHint::new("0-9", "days"),
                KeyHint::new("Enter", "done"),
                KeyHint::new("Esc", "done"),
            ],
        },
        crate::app::Section::Profiles => match state.profiles.mode {
            crate::app::ProfilesMode::List => vec![
                KeyHint::new("Enter", "apply"),
                KeyHint::new("c", "create"),
                KeyHint::new("r", "refresh"),
            ],
            crate::app::ProfilesMode::Edit => vec![
                KeyHint::new("Tab", "name/rows"),
                KeyHint::new("Enter", "save"),
                KeyHint::new("Esc", "cancel"),
            ],
        },
        crate::app::Section::Totals => match state.totals.mode {
            crate::app::TotalsMode::View => vec![KeyHint::new("e", "edit")],
            crate::app::TotalsMode::Edit => vec![
                KeyHint::new("Enter", "apply"),
                KeyHint::new("Tab", "next"),
                KeyHint::new("Esc", "cancel"),
            ],
        },
        crate::app::Section::Bank => vec![
            KeyHint::new("Enter", "select"),
            KeyHint::new("v", "show/hide"),
            KeyHint::new("c", "clear"),
            KeyHint::new("r", "refresh"),
        ],
    }
}
