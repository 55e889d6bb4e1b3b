use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    app::{AppState, PricingField, TotalsMode},
    ui::{
        components::money::{styled_allocation_bar, styled_amount, styled_amount_bold},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    let (form_area, summary_area) = if state.totals.mode == TotalsMode::Edit {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(layout[1]);
        (Some(split[0]), split[1])
    } else {
        (None, layout[1])
    };

    if let Some(form_area) = form_area {
        render_form(frame, form_area, state, &theme);
    }

    render_summary(frame, summary_area, state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mode = match state.totals.mode {
        TotalsMode::View => "View",
        TotalsMode::Edit => "Edit",
    };
    let line = vec![
        Span::styled("Mode", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {mode}")),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Totals");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.totals.form;

    let mut lines = vec![
        render_field(
            "Subtotal",
            form.subtotal.as_str(),
            form.focus == PricingField::Subtotal,
            theme,
        ),
        render_field(
            "VAT rate",
            form.tax_rate.as_str(),
            form.focus == PricingField::TaxRate,
            theme,
        ),
        Line::from(Span::styled(
            "Enter: apply • Tab: next • Esc: cancel",
            Style::default().fg(theme.text_muted),
        )),
    ];

    if let Some(err) = form.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title("Edit Pricing")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let currency = state.plan.currency();
    let pricing = &state.pricing;

    let allocated = state.plan.total_percentage();
    let allocation_note = if allocated < 100 {
        Span::styled(
            format!("  {}% unallocated", 100 - allocated),
            Style::default().fg(theme.warning),
        )
    } else if allocated == 100 {
        Span::styled("  complete", Style::default().fg(theme.positive))
    } else {
        Span::styled(
            format!("  over by {}%", allocated - 100),
            Style::default().fg(theme.error),
        )
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<14}", "Subtotal"), Style::default().fg(theme.text_muted)),
            styled_amount(pricing.subtotal().minor(), currency, theme),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:<14}", format!("VAT ({}%)", pricing.tax_rate())),
                Style::default().fg(theme.text_muted),
            ),
            styled_amount(pricing.tax_amount().minor(), currency, theme),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:<14}", "Grand total"),
                Style::default().fg(theme.text_muted),
            ),
            styled_amount_bold(pricing.grand_total().minor(), currency, theme),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{:<14}", "Allocated"),
                Style::default().fg(theme.text_muted),
            ),
            styled_allocation_bar(allocated, 20, theme),
            allocation_note,
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:<14}", "Installments"),
                Style::default().fg(theme.text_muted),
            ),
            Span::raw(state.plan.installments().len().to_string()),
        ]),
    ];

    let block = Block::default()
        .title("Pricing")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_field(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let shown = if focused {
        format!("{value}▌")
    } else {
        value.to_string()
    };
    Line::from(vec![
        Span::styled(format!("{label:<10}"), label_style),
        Span::raw(" "),
        Span::styled(shown, Style::default().fg(theme.text)),
    ])
}
