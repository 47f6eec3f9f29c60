use crate::editor::LineStore;
use crate::ui::text;
use crate::ui::viewport::Viewport;

use super::keymap::Mode;

/// Spaces inserted by TAB in Insert mode unless configured otherwise.
pub const DEFAULT_TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

/// A message shown on the bottom line until the next key.
#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
}

/// Which line-entry prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// `:` commands
    Command,
    /// `/` search pattern
    Search,
}

impl PromptKind {
    pub const fn leader(self) -> char {
        match self {
            Self::Command => ':',
            Self::Search => '/',
        }
    }
}

/// Text being typed on the bottom line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }
}

/// One editing session: a store, its viewport and the dispatcher state.
///
/// All state lives here; nothing is global except the keymap tables.
#[derive(Debug)]
pub struct Session {
    /// The open file
    pub store: LineStore,
    /// Window position and cursor
    pub viewport: Viewport,
    /// Active keymap
    pub mode: Mode,
    /// Open `:` or `/` prompt, if any
    pub prompt: Option<Prompt>,
    toast: Option<Toast>,
    /// Rendered rows of the buffer window, rebuilt on redisplay
    screen: Vec<String>,
    /// Set by quit; ends the event loop
    pub should_quit: bool,
    /// Quit was refused once for unsaved changes
    pub(super) quit_armed: bool,
    bell_pending: bool,
    pub bell_enabled: bool,
    pub tab_width: usize,
}

impl Session {
    /// Create a session showing `store` in a `width` x `height` buffer window.
    pub fn new(store: LineStore, width: u16, height: u16) -> Self {
        let viewport = Viewport::new(&store, width, height);
        let mut session = Self {
            store,
            viewport,
            mode: Mode::Command,
            prompt: None,
            toast: None,
            screen: Vec::new(),
            should_quit: false,
            quit_armed: false,
            bell_pending: false,
            bell_enabled: true,
            tab_width: DEFAULT_TAB_WIDTH,
        };
        session.refresh_screen();
        session
    }

    #[must_use]
    pub const fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    #[must_use]
    pub const fn with_bell(mut self, enabled: bool) -> Self {
        self.bell_enabled = enabled;
        self
    }

    /// Rebuild the buffer window snapshot from the store.
    pub fn refresh_screen(&mut self) {
        self.screen = self
            .viewport
            .visible_lines(&self.store)
            .map(|(_, line)| text::display_text(line.content()))
            .collect();
    }

    /// Rows of the buffer window as last refreshed. Rows past the end of the
    /// store are absent.
    pub fn screen(&self) -> &[String] {
        &self.screen
    }

    /// Adopt a new buffer window size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.resize(&self.store, width, height);
        self.refresh_screen();
        tracing::debug!(width, height, "resized");
    }

    /// Cursor position inside the buffer window as `(column, row)`.
    pub fn cursor_position(&self) -> (u16, u16) {
        let line = self.store.current_line();
        let column = text::screen_column(line.text(), self.viewport.cursor_col());
        let max_col = usize::from(self.viewport.width().saturating_sub(1));
        let row = self
            .viewport
            .cursor_row()
            .min(self.viewport.page_size() - 1);
        (
            u16::try_from(column.min(max_col)).unwrap_or(u16::MAX),
            u16::try_from(row).unwrap_or(u16::MAX),
        )
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Error => tracing::warn!(%message),
            ToastLevel::Info | ToastLevel::Warning => tracing::debug!(%message),
        }
        self.toast = Some(Toast { level, message });
    }

    pub(super) fn clear_toast(&mut self) {
        self.toast = None;
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub(super) const fn ring_bell(&mut self) {
        if self.bell_enabled {
            self.bell_pending = true;
        }
    }

    /// Whether a bell was requested since the last call.
    pub const fn take_bell(&mut self) -> bool {
        std::mem::replace(&mut self.bell_pending, false)
    }
}
