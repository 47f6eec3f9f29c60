//! Colors for the mode line, message line and filler rows.
//!
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::app::{Mode, ToastLevel};

/// Mode line style, colored by the active mode.
pub fn mode_line_style(mode: Mode) -> Style {
    let bg = match mode {
        Mode::Command => Color::DarkGray,
        Mode::Insert => Color::Magenta,
        Mode::Search => Color::Blue,
    };
    Style::default().bg(bg).fg(Color::White)
}

/// Style of the mode name badge inside the mode line.
pub fn mode_badge_style(mode: Mode) -> Style {
    mode_line_style(mode).add_modifier(Modifier::BOLD)
}

pub fn toast_style(level: ToastLevel) -> Style {
    match level {
        ToastLevel::Info => Style::default().fg(Color::Reset),
        ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
        ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
    }
}

/// Rows past the end of the file.
pub fn filler_style() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
}

pub fn prompt_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
