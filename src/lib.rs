// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditError)
    clippy::module_name_repetitions
)]

//! # Lined
//!
//! A small modal terminal line editor.
//!
//! A file is loaded into a [`LineStore`](editor::LineStore), shown through a
//! paging [`Viewport`](ui::viewport::Viewport), and edited with single-key
//! commands in three modes: Command, Insert and Search.
//!
//! ## Architecture
//!
//! - **Session**: all editing state, owned by the event loop
//! - **Keymaps**: per-mode tables from key to [`Action`](app::Action)
//! - **Dispatch**: run the bound action, report whether to redisplay
//! - **View**: render the session to the terminal
//!
//! ## Modules
//!
//! - [`editor`]: Line store and edit operations
//! - [`search`]: Substring search over the store
//! - [`ui`]: Viewport, rendering and styles
//! - [`app`]: Session, keymaps, dispatch and the event loop
//! - [`config`]: Config file flags

pub mod app;
pub mod config;
pub mod editor;
pub mod search;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{Action, App, KeyToken, Mode, Session, dispatch};
    pub use crate::editor::{LineId, LineStore};
    pub use crate::ui::viewport::Viewport;
}
