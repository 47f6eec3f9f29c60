use std::str::FromStr;

use crate::editor::{EditError, Line};
use crate::search::Match;

use super::keymap::{KEYMAPS, KeyToken, Mode};
use super::model::{Prompt, PromptKind, Session, ToastLevel};

/// Everything a key can be bound to.
///
/// [`Action::execute`] returns the redisplay flag: `true` when the buffer
/// window must be rebuilt before the next key is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Command mode
    /// Unbound key: ring the bell
    Bell,
    SearchNext,
    SearchPrevious,
    PageUp,
    PageDown,
    /// Jump to the page holding the last line
    LastPage,
    /// Open an empty line below and enter Insert mode
    OpenLine,
    LineDown,
    LineUp,
    MoveRight,
    MoveLeft,
    EndOfLine,
    BeginningOfLine,
    EnterInsert,
    /// Join the current line onto the previous one
    Join,
    DeleteChar,
    Save,
    DeleteLine,
    /// Open the `/` prompt
    StartSearch,
    /// Open the `:` prompt
    StartCommand,
    Quit,

    // Insert mode
    InsertChar,
    InsertReturn,
    InsertBackspace,
    InsertTab,
    EnterCommand,

    // Search mode
    /// Leave Search mode and forget the search
    AbortSearch,
}

impl Action {
    /// Run the action against `session`. `key` is the key that selected it.
    pub fn execute(self, session: &mut Session, key: KeyToken) -> bool {
        match self {
            Self::Bell => {
                session.ring_bell();
                false
            }
            Self::SearchNext => {
                let found = session.store.search_next();
                show_search_result(session, found)
            }
            Self::SearchPrevious => {
                let found = session.store.search_previous();
                show_search_result(session, found)
            }
            Self::PageUp => {
                session.viewport.page_up(&mut session.store);
                true
            }
            Self::PageDown => {
                session.viewport.page_down(&mut session.store);
                true
            }
            Self::LastPage => {
                session.viewport.goto_last_page(&mut session.store);
                true
            }
            Self::OpenLine => {
                let current = session.store.current();
                session.store.open_line_after(current);
                session.viewport.beginning_of_line();
                session.viewport.resync(&session.store);
                session.mode = Mode::Insert;
                true
            }
            Self::LineDown => line_down(session),
            Self::LineUp => line_up(session),
            Self::MoveRight => {
                session.viewport.move_right(&session.store);
                false
            }
            Self::MoveLeft => {
                session.viewport.move_left(&session.store);
                false
            }
            Self::EndOfLine => {
                session.viewport.end_of_line(&session.store);
                false
            }
            Self::BeginningOfLine => {
                session.viewport.beginning_of_line();
                false
            }
            Self::EnterInsert => {
                session.mode = Mode::Insert;
                false
            }
            Self::Join => join_with_previous(session),
            Self::DeleteChar => {
                let current = session.store.current();
                let column = session.viewport.cursor_col();
                let deleted = session.store.delete_char(current, column).is_ok();
                session.viewport.clamp_column(&session.store);
                deleted
            }
            Self::Save => {
                save(session);
                false
            }
            Self::DeleteLine => {
                delete_line(session);
                true
            }
            Self::StartSearch => {
                session.prompt = Some(Prompt::new(PromptKind::Search));
                false
            }
            Self::StartCommand => {
                session.prompt = Some(Prompt::new(PromptKind::Command));
                false
            }
            Self::Quit => {
                quit(session, false);
                false
            }
            Self::InsertChar => match key {
                KeyToken::Char(ch) => insert_text(session, ch.encode_utf8(&mut [0; 4])),
                _ => false,
            },
            Self::InsertReturn => insert_return(session),
            Self::InsertBackspace => backspace(session),
            Self::InsertTab => {
                let spaces = " ".repeat(session.tab_width);
                insert_text(session, &spaces)
            }
            Self::EnterCommand => {
                session.mode = Mode::Command;
                true
            }
            Self::AbortSearch => {
                session.store.clear_search();
                session.mode = Mode::Command;
                true
            }
        }
    }
}

/// Route one key through the active prompt or the active mode's keymap.
///
/// Returns the redisplay flag of whatever handled the key.
pub fn dispatch(session: &mut Session, key: KeyToken) -> bool {
    session.clear_toast();
    if session.prompt.is_some() {
        session.quit_armed = false;
        return prompt_key(session, key);
    }

    let action = KEYMAPS.for_mode(session.mode).lookup(key);
    if action != Action::Quit {
        session.quit_armed = false;
    }
    tracing::debug!(mode = %session.mode, %key, ?action, "dispatch");
    action.execute(session, key)
}

// --- Motion ---

fn line_down(session: &mut Session) -> bool {
    let Session {
        store, viewport, ..
    } = session;
    if store.next(store.current()).is_none() {
        return false;
    }
    if viewport.at_page_bottom() {
        viewport.page_down(store);
        true
    } else {
        viewport.line_down(store);
        false
    }
}

fn line_up(session: &mut Session) -> bool {
    let Session {
        store, viewport, ..
    } = session;
    let Some(above) = store.prev(store.current()) else {
        return false;
    };
    if viewport.at_page_top() {
        viewport.page_up(store);
        store.set_current(above);
        viewport.resync(store);
        true
    } else {
        viewport.line_up(store);
        false
    }
}

/// Show a search hit, or leave Search mode when there is none.
fn show_search_result(session: &mut Session, found: Option<Match>) -> bool {
    if let Some(Match { line, column }) = found {
        session
            .viewport
            .goto_position(&mut session.store, line, column);
        session.mode = Mode::Search;
        return true;
    }

    match session.store.search() {
        Some(state) => {
            let message = format!("Pattern not found: {}", state.pattern_display());
            session.store.clear_search();
            session.show_toast(ToastLevel::Warning, message);
        }
        None => session.show_toast(ToastLevel::Warning, "No previous search"),
    }
    session.mode = Mode::Command;
    false
}

// --- Editing ---

fn insert_text(session: &mut Session, text: &str) -> bool {
    let current = session.store.current();
    let mut column = session.viewport.cursor_col();
    for ch in text.chars() {
        if session.store.insert_char(current, column, ch).is_err() {
            break;
        }
        column += ch.len_utf8();
    }
    session.viewport.set_cursor_col(column);
    true
}

fn insert_return(session: &mut Session) -> bool {
    let column = session.viewport.cursor_col();
    match session.store.split_current_line(column) {
        Ok(_) => {}
        Err(EditError::NoOp | EditError::OutOfRange) => {
            let current = session.store.current();
            session.store.open_line_after(current);
        }
    }
    session.viewport.beginning_of_line();
    session.viewport.resync(&session.store);
    true
}

fn backspace(session: &mut Session) -> bool {
    let column = session.viewport.cursor_col();
    if column == 0 {
        return join_with_previous(session);
    }
    let current = session.store.current();
    let start = session.store.current_line().prev_boundary(column);
    // delete_char refuses the last byte of a line, which is content only
    // when the line has no terminator
    let removed = session.store.delete_char(current, start).is_ok()
        || session.store.truncate_line(current, start).is_ok();
    if removed {
        session.viewport.set_cursor_col(start);
    }
    removed
}

/// Merge the current line into the previous one, leaving the cursor at the
/// join point.
fn join_with_previous(session: &mut Session) -> bool {
    let Session {
        store, viewport, ..
    } = session;
    let current = store.current();
    let Some(join_column) = store
        .prev(current)
        .and_then(|prev| store.line(prev))
        .map(Line::end_column)
    else {
        return false;
    };
    if viewport.window_start() == current {
        if let Some(prev) = store.prev(current) {
            viewport.set_window_start(prev);
        }
    }
    if store.merge_line(current).is_err() {
        return false;
    }
    viewport.set_cursor_col(join_column);
    viewport.resync(store);
    true
}

fn delete_line(session: &mut Session) {
    let Session {
        store, viewport, ..
    } = session;
    let current = store.current();
    if viewport.window_start() == current {
        if let Some(replacement) = store.next(current).or_else(|| store.prev(current)) {
            viewport.set_window_start(replacement);
        }
    }
    store.delete_current_line();
    viewport.resync(store);
}

// --- Files and quitting ---

/// Write the store to disk, reporting the outcome on the message line.
fn save(session: &mut Session) -> bool {
    match session.store.save() {
        Ok(()) => {
            let message = format!(
                "\"{}\" {} lines written",
                session.store.name(),
                session.store.num_lines()
            );
            session.show_toast(ToastLevel::Info, message);
            true
        }
        Err(err) => {
            session.show_toast(ToastLevel::Error, err.to_string());
            false
        }
    }
}

/// Quit, or warn once when there are unsaved changes.
fn quit(session: &mut Session, force: bool) {
    if force || !session.store.is_modified() || session.quit_armed {
        session.should_quit = true;
        return;
    }
    session.quit_armed = true;
    session.show_toast(
        ToastLevel::Warning,
        "Unsaved changes: quit again to discard them",
    );
}

// --- Prompt ---

fn prompt_key(session: &mut Session, key: KeyToken) -> bool {
    let Some(prompt) = session.prompt.as_mut() else {
        return false;
    };
    match key {
        KeyToken::Char(ch) => prompt.input.push(ch),
        KeyToken::Backspace => {
            if prompt.input.pop().is_none() {
                session.prompt = None;
            }
        }
        KeyToken::Escape | KeyToken::Ctrl('c') => session.prompt = None,
        KeyToken::Return => {
            if let Some(prompt) = session.prompt.take() {
                return submit_prompt(session, prompt);
            }
        }
        _ => {}
    }
    false
}

fn submit_prompt(session: &mut Session, prompt: Prompt) -> bool {
    tracing::debug!(kind = ?prompt.kind, input = %prompt.input, "prompt submitted");
    match prompt.kind {
        PromptKind::Search => {
            if prompt.input.is_empty() {
                return false;
            }
            let from = session.store.index_of(session.store.current()).unwrap_or(0);
            let found = session.store.start_search(&prompt.input, from);
            show_search_result(session, found)
        }
        PromptKind::Command => match prompt.input.trim().parse::<ExCommand>() {
            Ok(command) => run_command(session, command),
            Err(err) => {
                session.show_toast(ToastLevel::Error, err.to_string());
                false
            }
        },
    }
}

/// A `:` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExCommand {
    /// `:w`
    Write,
    /// `:q`, refused while there are unsaved changes
    Quit,
    /// `:q!`
    ForceQuit,
    /// `:wq` or `:x`
    WriteQuit,
    /// `:N`, one-based
    Goto(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not an editor command: {0}")]
pub struct UnknownCommand(String);

impl FromStr for ExCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" => Ok(Self::Write),
            "q" => Ok(Self::Quit),
            "q!" => Ok(Self::ForceQuit),
            "wq" | "x" => Ok(Self::WriteQuit),
            _ => s
                .parse::<usize>()
                .map(Self::Goto)
                .map_err(|_| UnknownCommand(s.to_string())),
        }
    }
}

fn run_command(session: &mut Session, command: ExCommand) -> bool {
    match command {
        ExCommand::Write => {
            save(session);
            false
        }
        ExCommand::Quit => {
            if session.store.is_modified() {
                session.show_toast(
                    ToastLevel::Error,
                    "No write since last change (add ! to override)",
                );
            } else {
                session.should_quit = true;
            }
            false
        }
        ExCommand::ForceQuit => {
            quit(session, true);
            false
        }
        ExCommand::WriteQuit => {
            if save(session) {
                quit(session, true);
            }
            false
        }
        ExCommand::Goto(line) => {
            let last = session.store.num_lines() - 1;
            let column = session.viewport.cursor_col();
            session
                .viewport
                .goto_position(&mut session.store, line.saturating_sub(1).min(last), column)
        }
    }
}
