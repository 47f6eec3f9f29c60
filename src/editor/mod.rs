//! Line store for in-place text editing.
//!
//! Text is held as a doubly-linked chain of [`Line`]s living in an arena
//! owned by [`LineStore`]. Neighbour links are generational [`LineId`]
//! handles, so a handle to a freed line is detected instead of silently
//! aliasing a reused slot.

mod line;
mod store;

use std::path::PathBuf;

pub use line::{Line, LineId};
pub use store::{LineStore, Lines};

/// A structurally impossible or out-of-bounds edit.
///
/// Both variants are recovered locally by callers as silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Edit position outside the valid bounds of the line.
    #[error("edit position out of range")]
    OutOfRange,
    /// The edit cannot apply here (split past end of line, merge of the first line).
    #[error("nothing to do")]
    NoOp,
}

/// File access failure while loading or saving a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Can't read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Can't write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
