use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Session;

use super::style;

/// Text of the mode line: name, modified flag, mode, position and size.
pub fn mode_line_text(session: &Session) -> (String, String, String) {
    let store = &session.store;
    let modified = if store.is_modified() { " [+]" } else { "" };
    let name = format!(" {}{modified}  ", store.name());
    let mode = session.mode.as_str().to_string();
    let line = store.index_of(store.current()).unwrap_or(0) + 1;
    let position = format!(
        "  Ln {line}, Col {}  {} lines",
        session.viewport.cursor_col() + 1,
        store.num_lines()
    );
    (name, mode, position)
}

pub fn render_mode_line(session: &Session, frame: &mut Frame, area: Rect) {
    let (name, mode, position) = mode_line_text(session);
    let line = Line::from(vec![
        Span::raw(name),
        Span::styled(mode, style::mode_badge_style(session.mode)),
        Span::raw(position),
    ]);
    let bar = Paragraph::new(line).style(style::mode_line_style(session.mode));
    frame.render_widget(bar, area);
}

/// Render the prompt being typed, or the current message.
///
/// Returns the cursor position when a prompt is open.
pub fn render_message_line(session: &Session, frame: &mut Frame, area: Rect) -> Option<Position> {
    if let Some(prompt) = &session.prompt {
        let text = format!("{}{}", prompt.kind.leader(), prompt.input);
        let width = super::text::screen_column(text.as_bytes(), text.len());
        frame.render_widget(
            Paragraph::new(text).style(style::prompt_style()),
            area,
        );
        let x = u16::try_from(width)
            .unwrap_or(u16::MAX)
            .min(area.width.saturating_sub(1));
        return Some(Position::new(area.x + x, area.y));
    }

    if let Some((message, level)) = session.active_toast() {
        let toast = Paragraph::new(message.to_string()).style(style::toast_style(level));
        frame.render_widget(toast, area);
    }
    None
}
