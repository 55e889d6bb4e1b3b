use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, BuilderFocus, ProfilesMode},
    ui::{components::money::styled_allocation_bar, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    match state.profiles.mode {
        ProfilesMode::List => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(layout[1]);
            render_list(frame, columns[0], state, &theme);
            render_detail(frame, columns[1], state, &theme);
        }
        ProfilesMode::Edit => render_builder(frame, layout[1], state, &theme),
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mode = match state.profiles.mode {
        ProfilesMode::List => "List",
        ProfilesMode::Edit => "Builder",
    };
    let mut line = vec![
        Span::styled("Mode", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {mode}")),
    ];
    // The builder repeats its own error inline, so only the list shows it here.
    if state.profiles.mode == ProfilesMode::List
        && let Some(err) = state.profiles.error.as_ref()
    {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Profiles");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let linked_id = state.plan.profile().map(|link| link.id);
    let items = state
        .profiles
        .items
        .iter()
        .map(|profile| {
            let linked = if linked_id == Some(profile.id) {
                " ●"
            } else {
                ""
            };
            let saved = profile
                .created_at
                .map(|at| format!("  saved {}", at.format("%d %b %Y")))
                .unwrap_or_default();
            let text = format!(
                "{}{linked}  {} payments{saved}",
                profile.name,
                profile.payments.len()
            );
            ListItem::new(Line::from(text))
        })
        .collect::<Vec<_>>();

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if items.is_empty() {
        let empty_msg = Paragraph::new(Line::from(vec![
            Span::raw("No profiles. Press "),
            Span::styled("c", Style::default().fg(theme.accent)),
            Span::raw(" to create one."),
        ]))
        .alignment(Alignment::Center)
        .block(list_block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(state.profiles.selected));

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

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(profile) = state.profiles.items.get(state.profiles.selected) else {
        render_empty(frame, area, theme, "No profile selected.");
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", profile.name)),
        ]),
        Line::from(vec![
            Span::styled("Total", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}%", profile.total_percentage())),
        ]),
        Line::from(""),
    ];
    for (i, payment) in profile.payments.iter().enumerate() {
        lines.push(Line::from(format!(
            "{:>2}. {:>3}%  {}",
            i + 1,
            payment.percentage.value(),
            payment.describe()
        )));
    }

    let block = Block::default()
        .title("Profile")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_builder(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let draft = &state.profiles.draft;
    let name_focused = state.profiles.focus == BuilderFocus::Name;

    let name_label_style = if name_focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let name_value = if name_focused {
        format!("{}▌", draft.name)
    } else {
        draft.name.clone()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<10}", "Name"), name_label_style),
            Span::raw(" "),
            Span::raw(name_value),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Payments",
            Style::default().fg(theme.text_muted),
        )),
    ];

    if draft.payments.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (none. press a to add)",
            Style::default().fg(theme.text_muted),
        )));
    }
    for (i, payment) in draft.payments.iter().enumerate() {
        let marker = if state.profiles.focus == BuilderFocus::Rows && i == state.profiles.row {
            "» "
        } else {
            "  "
        };
        let style = if marker == "» " {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker}{:>2}. {:>3}%  {}",
                i + 1,
                payment.percentage.value(),
                payment.describe()
            ),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Allocated", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        styled_allocation_bar(draft.total_percentage(), 20, theme),
    ]));
    lines.push(Line::from(Span::styled(
        "Tab: name/rows • a: add • d: delete • +/-: percent • t: type • 0-9: days • Enter: save • Esc: cancel",
        Style::default().fg(theme.text_muted),
    )));

    if let Some(err) = state.profiles.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title("New Profile")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_empty(frame: &mut Frame<'_>, area: Rect, theme: &Theme, message: &str) {
    let block = Block::default()
        .title("Profile")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(
        Paragraph::new(Line::from(message))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
