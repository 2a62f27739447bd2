//! UI module for TUI rendering.

pub mod cards;
pub mod modals;
pub mod toast;

use crate::app::{App, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the card board and whatever overlay the mode calls for.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search
            Constraint::Min(8),    // Cards
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);
    cards::render(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    match &app.mode {
        Mode::Create(form) => modals::render_create(frame, app, form),
        Mode::Review { stars } => modals::render_review(frame, app, *stars),
        Mode::Browse | Mode::Search => {}
    }

    toast::render(frame, app);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let wallet = match &snapshot.wallet {
        Some(address) => Span::styled(
            short_address(address.as_str()),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("Not connected", Style::default().fg(Color::Red)),
    };
    let mut spans = vec![
        Span::styled(" PRIVATE RATINGS ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("Cards: {}", snapshot.cards.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" │ Wallet: "),
        wallet,
    ];
    if let Some(balance) = &snapshot.balance {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} ETH", balance),
            Style::default().fg(Color::White),
        ));
    }
    if !snapshot.gateway_ready {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("FHE offline", Style::default().fg(Color::Red)));
    }
    if snapshot.is_loading {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("Loading...", Style::default().fg(Color::Yellow)));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Anonymous Feedback "),
    );
    frame.render_widget(header, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.mode == Mode::Search;
    let text = if app.query.is_empty() && !focused {
        Span::styled("Search cards by title...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("{}{}", app.query, if focused { "_" } else { "" }))
    };
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Line::from(vec![Span::raw(" "), text])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search "),
    );
    frame.render_widget(search, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match app.mode {
        Mode::Browse => &[
            ("[←↑↓→] ", "Navigate  "),
            ("[Enter] ", "Rate  "),
            ("[N] ", "New card  "),
            ("[/] ", "Search  "),
            ("[C] ", "Connect  "),
            ("[R] ", "Refresh  "),
            ("[Q] ", "Quit"),
        ],
        Mode::Search => &[("[Enter] ", "Done  "), ("[Esc] ", "Clear")],
        Mode::Create(_) => &[
            ("[Tab] ", "Next field  "),
            ("[Enter] ", "Create  "),
            ("[Esc] ", "Cancel"),
        ],
        Mode::Review { .. } => &[
            ("[1-5 ←→] ", "Stars  "),
            ("[Enter] ", "Submit  "),
            ("[Esc] ", "Close"),
        ],
    };
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*label));
    }
    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Rect of the given percentage size centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            "0xf39F...2266"
        );
        assert_eq!(short_address("0xABC"), "0xABC");
    }
}
