//! Create-card and review overlays.

use super::centered_rect;
use crate::app::{App, CreateForm, FormField};
use pr_04_card_reconciliation::{ReviewStatus, MAX_RATING};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the create-card form.
pub fn render_create(frame: &mut Frame, app: &App, form: &CreateForm) {
    let area = centered_rect(60, 12, frame.area());
    let snapshot = &app.snapshot;

    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{:<13}", label), style.add_modifier(Modifier::BOLD)),
            Span::raw(value.to_string()),
            Span::raw(if focused { "_" } else { "" }),
        ])
    };

    let balance = snapshot
        .balance
        .as_deref()
        .map(|b| format!("{} ETH", b))
        .unwrap_or_else(|| "-".to_string());
    let status = if snapshot.is_creating {
        Span::styled(
            "Creating card, waiting for the transaction...",
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled("[Enter] Create card", Style::default().fg(Color::Green))
    };

    let lines = vec![
        field("Title", &form.title, form.field == FormField::Title),
        field(
            "Description",
            &form.description,
            form.field == FormField::Description,
        ),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Creation fee: "),
            Span::styled(
                format!("{} ETH", snapshot.creation_fee),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::raw("Your balance: "),
            Span::styled(balance, Style::default().fg(Color::Cyan)),
        ]),
        Line::raw(""),
        Line::from(status),
    ];

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" New Feedback Card "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}

/// Render the review form for the selected card.
pub fn render_review(frame: &mut Frame, app: &App, stars: u8) {
    let area = centered_rect(50, 11, frame.area());
    let snapshot = &app.snapshot;
    let Some(card) = &snapshot.selected else {
        return;
    };

    let picker: Vec<Span> = (1..=MAX_RATING)
        .map(|n| {
            if n <= stars {
                Span::styled("★ ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("☆ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let status = if app.review_loading.is_some() {
        Span::styled(
            "Checking for an earlier rating...",
            Style::default().fg(Color::DarkGray),
        )
    } else if snapshot.has_voted {
        Span::styled(
            "You have already rated this card.",
            Style::default().fg(Color::Green),
        )
    } else if snapshot.review_status == ReviewStatus::Idle {
        Span::styled(
            format!("[Enter] {}", ReviewStatus::Idle.label()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled(
            snapshot.review_status.label(),
            Style::default().fg(Color::Yellow),
        )
    };

    let lines = vec![
        Line::from(Span::styled(
            card.description.clone().unwrap_or_default(),
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
        Line::from(picker),
        Line::raw(""),
        Line::from(Span::styled(
            "Your rating is encrypted before it leaves this machine.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        Line::from(status),
    ];

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" Rate: {} ", card.title)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}
