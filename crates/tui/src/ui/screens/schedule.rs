use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use engine::{DueStatus, Money, classify};

use crate::{
    app::{AppState, ScheduleMode},
    ui::{components::money::styled_allocation_bar, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    let (editor_area, list_area) = if state.schedule.mode == ScheduleMode::Edit {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(layout[1]);
        (Some(split[0]), split[1])
    } else {
        (None, layout[1])
    };

    if let Some(editor_area) = editor_area {
        render_editor(frame, editor_area, state, &theme);
    }

    render_list(frame, list_area, state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mode = match state.schedule.mode {
        ScheduleMode::List => "List",
        ScheduleMode::Edit => "Edit",
    };
    let mut line = vec![
        Span::styled("Mode", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {mode}   ")),
        Span::styled("Allocated", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        styled_allocation_bar(state.plan.total_percentage(), 20, theme),
    ];
    // The editor repeats its own error inline, so only the list shows it here.
    if state.schedule.mode == ScheduleMode::List
        && let Some(err) = state.schedule.error.as_ref()
    {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Schedule");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_editor(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rows = state.plan.rows();
    let Some(row) = rows.get(state.schedule.selected) else {
        return;
    };

    // The field mirrors the entry in progress, which may be empty while the
    // plan still holds the last committed offset.
    let days = if row.due_type.requires_days() {
        state
            .schedule
            .days
            .map(|days| days.to_string())
            .unwrap_or_else(|| "-".to_string())
    } else {
        "-".to_string()
    };
    let resolves = match row.due_date {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => {
            let status = classify(row.due_type, row.due_days, state.plan.opportunity());
            status.message().to_string()
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Percentage", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}%", row.percentage)),
        ]),
        Line::from(vec![
            Span::styled("Due", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", row.description)),
        ]),
        Line::from(vec![
            Span::styled("Days", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {days}")),
        ]),
        Line::from(vec![
            Span::styled("Resolves", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {resolves}")),
        ]),
        Line::from(Span::styled(
            "+/- or ↑/↓: percent • t: due type • 0-9: days • Enter: done • Esc: done",
            Style::default().fg(theme.text_muted),
        )),
    ];

    if let Some(err) = state.schedule.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title(format!("Edit Installment {}", row.order))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let today = crate::app::today();
    let items = state
        .plan
        .rows()
        .iter()
        .map(|row| {
            let amount = Money::new(row.amount_minor).format(row.currency);
            let mut spans = vec![
                Span::raw(format!("{:>2}. ", row.order)),
                Span::raw(format!("{:>3}%  ", row.percentage)),
                Span::raw(format!("{amount:<16}")),
                Span::raw(format!("{:<32}", row.description)),
            ];
            match row.due_date {
                Some(date) => {
                    spans.push(Span::styled(
                        date.format("%d %b %Y").to_string(),
                        date_style(date, today, theme),
                    ));
                }
                None => {
                    let status = classify(row.due_type, row.due_days, state.plan.opportunity());
                    let color = if status == DueStatus::Unresolved {
                        theme.negative
                    } else {
                        theme.warning
                    };
                    spans.push(Span::styled(status.label(), Style::default().fg(color)));
                }
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if items.is_empty() {
        let empty_msg = Paragraph::new(Line::from(vec![
            Span::raw("No installments. Press "),
            Span::styled("a", Style::default().fg(theme.accent)),
            Span::raw(" to add one."),
        ]))
        .alignment(Alignment::Center)
        .block(list_block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(state.schedule.selected));

    let list = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn date_style(date: NaiveDate, today: NaiveDate, theme: &Theme) -> Style {
    if date < today {
        Style::default().fg(theme.error)
    } else if date == today {
        Style::default().fg(theme.warning)
    } else {
        Style::default().fg(theme.text)
    }
}
