use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Session;

use super::{status, style};

/// Split the frame into buffer window, mode line and message line.
pub fn split_rows(area: Rect) -> (Rect, Rect, Rect) {
    let text_height = area.height.saturating_sub(2).max(1);
    let text_area = Rect {
        height: text_height.min(area.height),
        ..area
    };
    let mode_area = Rect {
        y: area.y + text_height,
        height: u16::from(area.height > text_height),
        ..area
    };
    let message_area = Rect {
        y: area.y + text_height + 1,
        height: u16::from(area.height > text_height + 1),
        ..area
    };
    (text_area, mode_area, message_area)
}

/// Render the complete UI.
pub fn render(session: &Session, frame: &mut Frame) {
    let (text_area, mode_area, message_area) = split_rows(frame.area());

    render_buffer(session, frame, text_area);
    status::render_mode_line(session, frame, mode_area);
    let prompt_cursor = status::render_message_line(session, frame, message_area);

    let cursor = prompt_cursor.unwrap_or_else(|| {
        let (col, row) = session.cursor_position();
        Position::new(
            text_area.x + col.min(text_area.width.saturating_sub(1)),
            text_area.y + row.min(text_area.height.saturating_sub(1)),
        )
    });
    frame.set_cursor_position(cursor);
}

/// Paint the last refreshed snapshot, with `~` on rows past the end of file.
fn render_buffer(session: &Session, frame: &mut Frame, area: Rect) {
    let rows = usize::from(area.height);
    let screen = session.screen();
    let content: Vec<Line> = (0..rows)
        .map(|row| {
            screen.get(row).map_or_else(
                || Line::styled("~", style::filler_style()),
                |text| Line::raw(text.as_str()),
            )
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}
