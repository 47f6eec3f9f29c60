//! Modes, canonical key tokens and the per-mode keymap tables.

use std::fmt;
use std::sync::LazyLock;

use super::update::Action;

/// Editing mode. Selects the active keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Command,
    Insert,
    Search,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "COMMAND",
            Self::Insert => "INSERT",
            Self::Search => "SEARCH",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key reduced to the form keymaps are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// A printable character.
    Char(char),
    /// A control chord, stored as the lowercase letter (`^C` is `Ctrl('c')`).
    Ctrl(char),
    Return,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "^{}", c.to_ascii_uppercase()),
            Self::Return => f.write_str("RET"),
            Self::Escape => f.write_str("ESC"),
            Self::Backspace => f.write_str("\\b"),
            Self::Tab => f.write_str("\\t"),
            Self::Up => f.write_str("UP"),
            Self::Down => f.write_str("DOWN"),
            Self::Left => f.write_str("LEFT"),
            Self::Right => f.write_str("RIGHT"),
        }
    }
}

/// Ordered bindings for one mode plus the action for unbound keys.
#[derive(Debug)]
pub struct Keymap {
    name: &'static str,
    bindings: Vec<(KeyToken, Action)>,
    default: Action,
}

impl Keymap {
    fn new(name: &'static str, default: Action) -> Self {
        Self {
            name,
            bindings: Vec::new(),
            default,
        }
    }

    fn bind(mut self, key: KeyToken, action: Action) -> Self {
        self.bindings.push((key, action));
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The action for `key`, falling back to the mode default.
    pub fn lookup(&self, key: KeyToken) -> Action {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map_or(self.default, |(_, action)| *action)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (KeyToken, Action)> + '_ {
        self.bindings.iter().copied()
    }
}

/// The three keymaps, one per mode.
#[derive(Debug)]
pub struct Keymaps {
    command: Keymap,
    insert: Keymap,
    search: Keymap,
}

impl Keymaps {
    /// The editor's standard bindings.
    pub fn standard() -> Self {
        use KeyToken::{Backspace, Char, Ctrl, Down, Escape, Left, Return, Right, Tab, Up};

        let command = Keymap::new("command", Action::Bell)
            .bind(Char('n'), Action::SearchNext)
            .bind(Char('N'), Action::SearchPrevious)
            .bind(Char('<'), Action::PageUp)
            .bind(Char('>'), Action::PageDown)
            .bind(Char('G'), Action::LastPage)
            .bind(Char('o'), Action::OpenLine)
            .bind(Char('j'), Action::LineDown)
            .bind(Down, Action::LineDown)
            .bind(Char('k'), Action::LineUp)
            .bind(Up, Action::LineUp)
            .bind(Char('l'), Action::MoveRight)
            .bind(Right, Action::MoveRight)
            .bind(Char('h'), Action::MoveLeft)
            .bind(Left, Action::MoveLeft)
            .bind(Char('$'), Action::EndOfLine)
            .bind(Char('^'), Action::BeginningOfLine)
            .bind(Char('i'), Action::EnterInsert)
            .bind(Char('J'), Action::Join)
            .bind(Char('x'), Action::DeleteChar)
            .bind(Char('s'), Action::Save)
            .bind(Char('d'), Action::DeleteLine)
            .bind(Char('/'), Action::StartSearch)
            .bind(Char(':'), Action::StartCommand)
            .bind(Ctrl('c'), Action::Quit)
            .bind(Char('q'), Action::Quit);

        let insert = Keymap::new("insert", Action::InsertChar)
            .bind(Ctrl('c'), Action::EnterCommand)
            .bind(Return, Action::InsertReturn)
            .bind(Backspace, Action::InsertBackspace)
            .bind(Escape, Action::EnterCommand)
            .bind(Tab, Action::InsertTab)
            .bind(Down, Action::LineDown)
            .bind(Up, Action::LineUp)
            .bind(Right, Action::MoveRight)
            .bind(Left, Action::MoveLeft);

        let search = Keymap::new("search", Action::EnterCommand)
            .bind(Char('n'), Action::SearchNext)
            .bind(Char('N'), Action::SearchPrevious)
            .bind(Escape, Action::AbortSearch)
            .bind(Ctrl('c'), Action::AbortSearch);

        Self {
            command,
            insert,
            search,
        }
    }

    pub const fn for_mode(&self, mode: Mode) -> &Keymap {
        match mode {
            Mode::Command => &self.command,
            Mode::Insert => &self.insert,
            Mode::Search => &self.search,
        }
    }
}

/// Process-wide keymap tables, built on first use.
pub static KEYMAPS: LazyLock<Keymaps> = LazyLock::new(Keymaps::standard);
