use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);
    render_list(frame, columns[0], state, &theme);
    render_detail(frame, columns[1], state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let shown = if state.plan.show_bank_details() {
        Span::styled("shown on proposal", Style::default().fg(theme.positive))
    } else {
        Span::styled("hidden on proposal", Style::default().fg(theme.text_muted))
    };
    let mut line = vec![
        Span::styled("Details", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        shown,
    ];
    if let Some(err) = state.bank.error.as_ref() {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Bank");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let selected_id = state.plan.bank_account().map(|account| account.id);
    let items = state
        .bank
        .items
        .iter()
        .map(|account| {
            let marker = if selected_id == Some(account.id) {
                " ●"
            } else {
                ""
            };
            let text = format!(
                "{}  {}  ({}){marker}",
                account.bank_name, account.account_name, account.currency
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
            Span::raw("No bank accounts. Press "),
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" to reload."),
        ]))
        .alignment(Alignment::Center)
        .block(list_block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(state.bank.selected));

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
    let Some(account) = state.plan.bank_account() else {
        render_empty(
            frame,
            area,
            theme,
            "No account selected. Press Enter to pick one.",
        );
        return;
    };

    let shown = if state.plan.show_bank_details() {
        Span::styled("YES", Style::default().fg(theme.positive))
    } else {
        Span::styled("NO", Style::default().fg(theme.text_muted))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Bank", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", account.bank_name)),
        ]),
        Line::from(vec![
            Span::styled("Account", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", account.account_name)),
        ]),
        Line::from(vec![
            Span::styled("IBAN", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", account.iban)),
        ]),
        Line::from(vec![
            Span::styled("Currency", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", account.currency)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("On proposal", Style::default().fg(theme.text_muted)),
            Span::raw(": "),
            shown,
        ]),
    ];

    let block = Block::default()
        .title("Selected Account")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_empty(frame: &mut Frame<'_>, area: Rect, theme: &Theme, message: &str) {
    let block = Block::default()
        .title("Selected Account")
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
