//! Layout components (header, step progress, status bar)

use crate::app::App;
use crate::platform::{NEXT_FALLBACK_SHORTCUT, NEXT_SHORTCUT};
use crate::state::{View, WizardStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Height of the wizard header: gauge plus step names, inside a border
const HEADER_HEIGHT: u16 = 4;

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header: step progress while in the wizard, the view title otherwise
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" {} ", app.state.current_view.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.state.current_view.is_form_view() {
        return;
    }

    let wizard = &app.state.form.wizard;
    let current = wizard.current_step();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(wizard.progress().clamp(0.0, 1.0))
        .label(format!(
            "Step {} of {}",
            current.number(),
            wizard.total_steps()
        ));
    frame.render_widget(gauge, rows[0]);

    let mut spans = Vec::new();
    for step in WizardStep::ALL {
        let style = if step == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step < current {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if !spans.is_empty() {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("{}. {}", step.number(), step.title()),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", get_view_hints(app)),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    if app.state.pending_redirect.is_some() {
        return "Please wait...".to_string();
    }
    match app.state.current_view {
        View::Wizard => {
            let submit = if app.state.form.wizard.current_step().is_last() {
                "submit"
            } else {
                "next"
            };
            format!(
                "Tab:field  ←/→:choose  {NEXT_SHORTCUT}/{NEXT_FALLBACK_SHORTCUT}:{submit}  Esc:back"
            )
        }
        View::VerifyEmail | View::Welcome => "Enter:new registration  q:quit".to_string(),
    }
}
