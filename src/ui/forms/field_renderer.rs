//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by one field: bordered input plus an error line
pub const FIELD_HEIGHT: u16 = 4;

/// Draw a form field using FormField from the domain layer
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let border_color = match (field.has_error(), is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_value
    };

    // Typed fields show a caret, the others a key hint
    let cursor = match (is_active, field.kind) {
        (false, _) => "",
        (true, kind) if kind.accepts_text() => "▌",
        (true, FieldKind::Checkbox) => "  space to toggle",
        (true, _) => "  ←/→ to change",
    };

    let input_area = Rect {
        height: area.height.min(3),
        ..area
    };
    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
    .block(block);
    frame.render_widget(content, input_area);

    if let Some(error) = &field.error {
        if area.height > 3 {
            let error_area = Rect {
                y: area.y + 3,
                height: 1,
                ..area
            };
            frame.render_widget(
                Paragraph::new(format!(" {error}")).style(Style::default().fg(Color::Red)),
                error_area,
            );
        }
    }
}
