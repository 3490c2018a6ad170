//! Views shown after a successful registration

use crate::app::App;
use crate::state::View;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the verify-email or welcome view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let email = app.state.registered_email.as_deref().unwrap_or("your address");

    let (headline, detail) = match app.state.current_view {
        View::VerifyEmail => (
            "Almost there!",
            format!("We sent a confirmation link to {email}. Open it to activate your account."),
        ),
        _ => (
            "Your account is ready",
            format!("You can now sign in with {email}."),
        ),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(detail),
    ];
    if let Some(message) = &app.state.outcome_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Gray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}
