use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keymap::KeyToken;

/// Reduce a terminal key event to a [`KeyToken`].
///
/// Key releases and keys with no binding form (function keys, media keys)
/// yield `None`.
pub fn key_token(key: KeyEvent) -> Option<KeyToken> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('h') if ctrl => Some(KeyToken::Backspace),
        KeyCode::Char('m' | 'j') if ctrl => Some(KeyToken::Return),
        KeyCode::Char('i') if ctrl => Some(KeyToken::Tab),
        KeyCode::Char('[') if ctrl => Some(KeyToken::Escape),
        KeyCode::Char(c) if ctrl => Some(KeyToken::Ctrl(c.to_ascii_lowercase())),
        KeyCode::Char('\u{7f}') => Some(KeyToken::Backspace),
        KeyCode::Char(c) => Some(KeyToken::Char(c)),
        KeyCode::Enter => Some(KeyToken::Return),
        KeyCode::Esc => Some(KeyToken::Escape),
        KeyCode::Backspace => Some(KeyToken::Backspace),
        KeyCode::Tab => Some(KeyToken::Tab),
        KeyCode::Up => Some(KeyToken::Up),
        KeyCode::Down => Some(KeyToken::Down),
        KeyCode::Left => Some(KeyToken::Left),
        KeyCode::Right => Some(KeyToken::Right),
        _ => None,
    }
}
