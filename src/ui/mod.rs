//! Terminal UI components.
//!
//! - [`viewport`]: Window start, paging and cursor placement
//! - [`text`]: Line bytes to screen text
//! - [`style`]: Colors

pub mod style;
pub mod text;
pub mod viewport;

mod render;
mod status;

pub use render::{render, split_rows};
pub use status::mode_line_text;
