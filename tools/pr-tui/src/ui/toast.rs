//! Toast notices.

use crate::app::App;
use pr_04_card_reconciliation::NoticeKind;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the current toast in the top-right corner.
pub fn render(frame: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };
    let screen = frame.area();
    let width = screen.width.min(48);
    let area = Rect::new(screen.width.saturating_sub(width), 1, width, 4).intersection(screen);

    let color = match toast.notice.kind {
        NoticeKind::Error => Color::Red,
        NoticeKind::ConnectWallet | NoticeKind::EventNotFound => Color::Yellow,
        NoticeKind::CardPending => Color::Cyan,
        NoticeKind::CardConfirmed | NoticeKind::RatingSubmitted => Color::Green,
    };

    let widget = Paragraph::new(Line::raw(toast.notice.message.clone()))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}
