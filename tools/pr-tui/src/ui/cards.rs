//! Card grid rendering.

use crate::app::{App, GRID_COLUMNS};
use chrono::DateTime;
use pr_04_card_reconciliation::{Card, DegradedReason};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows taken by one card.
const CARD_HEIGHT: u16 = 7;

/// Render the visible cards as a grid, scrolled to keep the highlight shown.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.cards.is_empty() {
        let text = if app.snapshot.is_loading {
            "Loading cards..."
        } else if app.query.is_empty() {
            "No cards yet. Press [N] to create the first one."
        } else {
            "No cards match your search."
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL).title(" Cards "));
        frame.render_widget(empty, area);
        return;
    }

    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selected / GRID_COLUMNS;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (slot, row_area) in rows.iter().enumerate() {
        let row = first_row + slot;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);
        for (col, cell) in columns.iter().enumerate() {
            let index = row * GRID_COLUMNS + col;
            if let Some(card) = app.cards.get(index) {
                render_card(frame, card, index == app.selected, *cell);
            }
        }
    }
}

fn render_card(frame: &mut Frame, card: &Card, highlighted: bool, area: Rect) {
    let border = if highlighted {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let description = card.description.clone().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled(stars(card), Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(card.formatted_average(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{} reviews", card.total_reviews),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" │ "),
            Span::raw(format_date(card.created_at)),
        ]),
        badge(card),
    ];

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                format!(" {} ", card.title),
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(widget, area);
}

fn badge(card: &Card) -> Line<'static> {
    if card.is_pending() {
        return Line::from(Span::styled(
            "⏳ Pending confirmation",
            Style::default().fg(Color::Magenta),
        ));
    }
    if card.is_decrypting() {
        return Line::from(Span::styled(
            "🔓 Decrypting...",
            Style::default().fg(Color::Yellow),
        ));
    }
    match card.degraded_reason() {
        Some(DegradedReason::ServiceUnavailable) => Line::from(Span::styled(
            "🔒 Encryption service unavailable",
            Style::default().fg(Color::Red),
        )),
        Some(DegradedReason::Failed) => Line::from(Span::styled(
            "🔒 Could not decrypt",
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "🔐 FHE protected",
            Style::default().fg(Color::Green),
        )),
    }
}

/// Five stars with the rounded average filled.
fn stars(card: &Card) -> String {
    let filled = card.average_rating().round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Creation date, e.g. `Jan 05, 2025`.
pub fn format_date(created_at_ms: u64) -> String {
    i64::try_from(created_at_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}
