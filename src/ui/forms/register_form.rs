//! Registration wizard form rendering

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{FormButton, RegistrationForm, WizardStep};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const BUTTON_WIDTH: u16 = 14;

/// Draw the current wizard step
pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let step = form.wizard.current_step();

    let block = Block::default()
        .title(format!(" {} ", step.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Fields
            Constraint::Length(1),             // Challenge / notice
            Constraint::Length(1),             // Global error
            Constraint::Length(BUTTON_HEIGHT), // Buttons
        ])
        .margin(1)
        .split(inner);

    draw_fields(frame, chunks[0], form);

    if step == WizardStep::Confirmation {
        draw_challenge(frame, chunks[1], app);
    }

    if let Some(error) = form.wizard.draft().global_error() {
        frame.render_widget(
            Paragraph::new(error.to_string()).style(
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            chunks[2],
        );
    }

    draw_buttons(frame, chunks[3], form);
}

/// Fields that fit in the area, scrolled so the active one is visible
fn draw_fields(frame: &mut Frame, area: Rect, form: &RegistrationForm) {
    let fields = form.fields();
    let capacity = (area.height / FIELD_HEIGHT).max(1) as usize;
    let active = form.active_field_index;
    let first = visible_window_start(active.min(fields.len().saturating_sub(1)), capacity);

    for (row, (index, field)) in fields
        .iter()
        .enumerate()
        .skip(first)
        .take(capacity)
        .enumerate()
    {
        let field_area = Rect {
            y: area.y + row as u16 * FIELD_HEIGHT,
            height: FIELD_HEIGHT.min(area.height.saturating_sub(row as u16 * FIELD_HEIGHT)),
            ..area
        };
        if field_area.height == 0 {
            break;
        }
        draw_field(frame, field_area, field, index == active);
    }
}

/// First field index to draw so that `active` is inside the window
fn visible_window_start(active: usize, capacity: usize) -> usize {
    (active + 1).saturating_sub(capacity)
}

fn draw_challenge(frame: &mut Frame, area: Rect, app: &App) {
    let verified = app.state.form.wizard.draft().verification_token().is_some();
    let line = match &app.state.challenge_code {
        _ if verified => Line::from(Span::styled(
            "✓ Verified",
            Style::default().fg(Color::Green),
        )),
        Some(code) => Line::from(vec![
            Span::raw("Type this code in the verification field and press Enter: "),
            Span::styled(
                code.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            "Verification is unavailable right now",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_buttons(frame: &mut Frame, area: Rect, form: &RegistrationForm) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Min(0),
            Constraint::Length(BUTTON_WIDTH),
        ])
        .split(area);

    let on_buttons = form.is_buttons_row_active();
    let wizard = &form.wizard;
    let can_go_back = wizard.current_step().prev().is_some();
    let next_label = if wizard.current_step().is_last() {
        "Submit"
    } else {
        "Next"
    };

    render_button(
        frame,
        chunks[0],
        "Back",
        on_buttons && form.selected_button == FormButton::Back,
        can_go_back,
    );
    render_button(
        frame,
        chunks[2],
        next_label,
        on_buttons && form.selected_button == FormButton::Next,
        true,
    );
}
