//! Editor session, modal dispatch and the main event loop.
//!
//! - [`Session`]: the complete editing state
//! - [`Action`]: everything a key can be bound to
//! - [`dispatch`]: route one key through the active mode's keymap
//! - [`App::run`]: terminal setup, blocking key loop, redisplay

mod event_loop;
mod input;
mod keymap;
mod model;
mod update;

pub use input::key_token;
pub use keymap::{KEYMAPS, KeyToken, Keymap, Keymaps, Mode};
pub use model::{DEFAULT_TAB_WIDTH, Prompt, PromptKind, Session, ToastLevel};
pub use update::{Action, ExCommand, UnknownCommand, dispatch};

use std::path::PathBuf;

/// Main application struct that owns the file path and the editor options.
pub struct App {
    file_path: PathBuf,
    tab_width: usize,
    bell_enabled: bool,
}

impl App {
    /// Create a new application for the given file.
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            tab_width: DEFAULT_TAB_WIDTH,
            bell_enabled: true,
        }
    }

    /// Number of spaces TAB inserts in Insert mode.
    #[must_use]
    pub const fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Enable or disable the terminal bell.
    #[must_use]
    pub const fn with_bell(mut self, enabled: bool) -> Self {
        self.bell_enabled = enabled;
        self
    }
}
