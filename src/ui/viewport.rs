//! Viewport management for paging.
//!
//! The [`Viewport`] tracks which line sits at the top of the buffer window
//! and where the cursor is inside that window. The current line itself is
//! owned by the [`LineStore`]; the viewport moves it and keeps
//! `cursor_row` in step.

use crate::editor::{Line, LineId, LineStore};

/// Maps the store's current line and column to a window position.
///
/// # Example
///
/// ```
/// use lined::editor::LineStore;
/// use lined::ui::viewport::Viewport;
///
/// let content: String = (0..25).map(|i| format!("line {i}\n")).collect();
/// let mut store = LineStore::from_bytes("doc.txt", content.as_bytes());
/// let mut vp = Viewport::new(&store, 80, 10);
///
/// vp.page_down(&mut store);
/// assert_eq!(store.index_of(vp.window_start()), Some(10));
/// assert_eq!(store.index_of(store.current()), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    window_start: LineId,
    width: u16,
    height: u16,
    cursor_row: usize,
    cursor_col: usize,
}

impl Viewport {
    /// Create a viewport showing the store from its current line.
    ///
    /// # Arguments
    ///
    /// * `width` - Buffer window width in columns
    /// * `height` - Buffer window height in rows (at least 1)
    pub fn new(store: &LineStore, width: u16, height: u16) -> Self {
        Self {
            window_start: store.current(),
            width,
            height: height.max(1),
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    pub const fn window_start(&self) -> LineId {
        self.window_start
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Rows per page.
    pub const fn page_size(&self) -> usize {
        self.height as usize
    }

    /// Row of the current line, relative to the window start.
    pub const fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    /// Byte column of the cursor in the current line.
    pub const fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    pub const fn set_cursor_col(&mut self, col: usize) {
        self.cursor_col = col;
    }

    /// Put `id` at the top of the window. Callers resync afterwards.
    pub const fn set_window_start(&mut self, id: LineId) {
        self.window_start = id;
    }

    /// Whether the cursor is on the last row of the window.
    pub const fn at_page_bottom(&self) -> bool {
        self.cursor_row + 1 >= self.page_size()
    }

    pub const fn at_page_top(&self) -> bool {
        self.cursor_row == 0
    }

    /// Lines currently in the window, top to bottom.
    pub fn visible_lines<'a>(
        &self,
        store: &'a LineStore,
    ) -> impl Iterator<Item = (LineId, &'a Line)> + use<'a> {
        store.iter_from(self.window_start).take(self.page_size())
    }

    // --- Paging ---

    /// Advance the window by one page. Stops at the last line.
    pub fn page_down(&mut self, store: &mut LineStore) {
        let mut target = self.window_start;
        for _ in 0..self.page_size() {
            match store.next(target) {
                Some(next) => target = next,
                None => break,
            }
        }
        self.land_on_page(store, target);
    }

    /// Move the window back by one page. Stops at the head.
    pub fn page_up(&mut self, store: &mut LineStore) {
        let mut target = self.window_start;
        for _ in 0..self.page_size() {
            match store.prev(target) {
                Some(prev) => target = prev,
                None => break,
            }
        }
        self.land_on_page(store, target);
    }

    fn land_on_page(&mut self, store: &mut LineStore, start: LineId) {
        self.window_start = start;
        store.set_current(start);
        self.cursor_row = 0;
        self.clamp_column(store);
        tracing::debug!(window_start = ?store.index_of(start), "paged");
    }

    /// Show the page holding the last line and make that line current.
    pub fn goto_last_page(&mut self, store: &mut LineStore) {
        let last = store.num_lines() - 1;
        self.goto_position(store, last, self.cursor_col);
    }

    /// Make line `line` current with the cursor at `column`.
    ///
    /// The window lands on the page boundary (a multiple of the height,
    /// counted from the head) that contains the line. Returns `false` when
    /// the line does not exist.
    pub fn goto_position(&mut self, store: &mut LineStore, line: usize, column: usize) -> bool {
        let Some(target) = store.nth(line) else {
            return false;
        };
        let page = self.page_size();
        let page_start = store.nth(line / page * page).unwrap_or(target);
        self.window_start = page_start;
        store.set_current(target);
        self.cursor_row = line % page;
        self.cursor_col = column;
        self.clamp_column(store);
        true
    }

    // --- Line moves ---

    /// Move to the next line within the window. Returns `false` at the last line.
    ///
    /// Does not scroll; callers page down when [`at_page_bottom`](Self::at_page_bottom).
    pub fn line_down(&mut self, store: &mut LineStore) -> bool {
        let Some(next) = store.next(store.current()) else {
            return false;
        };
        store.set_current(next);
        self.cursor_row += 1;
        self.clamp_column(store);
        true
    }

    /// Move to the previous line within the window. Returns `false` at the head.
    pub fn line_up(&mut self, store: &mut LineStore) -> bool {
        let Some(prev) = store.prev(store.current()) else {
            return false;
        };
        store.set_current(prev);
        self.cursor_row = self.cursor_row.saturating_sub(1);
        self.clamp_column(store);
        true
    }

    // --- Column moves ---

    pub fn move_right(&mut self, store: &LineStore) {
        let line = store.current_line();
        self.cursor_col = line.next_boundary(self.cursor_col).min(line.end_column());
    }

    pub fn move_left(&mut self, store: &LineStore) {
        self.cursor_col = store.current_line().prev_boundary(self.cursor_col);
    }

    pub fn end_of_line(&mut self, store: &LineStore) {
        self.cursor_col = store.current_line().end_column();
    }

    pub const fn beginning_of_line(&mut self) {
        self.cursor_col = 0;
    }

    /// Keep the cursor inside the current line's content.
    ///
    /// The column may sit on the terminator position so text can be
    /// appended, but never past it.
    pub fn clamp_column(&mut self, store: &LineStore) {
        self.cursor_col = self.cursor_col.min(store.current_line().end_column());
    }

    // --- Synchronisation ---

    /// Recompute `cursor_row` from the store and scroll the minimum needed
    /// to keep the current line on screen.
    ///
    /// A window start that no longer resolves is replaced by the current line.
    pub fn resync(&mut self, store: &LineStore) {
        if !store.contains(self.window_start) {
            self.window_start = store.current();
        }
        let current = store.index_of(store.current()).unwrap_or(0);
        let start = store.index_of(self.window_start).unwrap_or(current);
        let page = self.page_size();

        if current < start {
            self.window_start = store.current();
            self.cursor_row = 0;
        } else if current - start >= page {
            let top = current + 1 - page;
            self.window_start = store.nth(top).unwrap_or_else(|| store.current());
            self.cursor_row = current - top;
        } else {
            self.cursor_row = current - start;
        }
        self.clamp_column(store);
    }

    /// Adopt new window geometry.
    pub fn resize(&mut self, store: &LineStore, width: u16, height: u16) {
        self.width = width;
        self.height = height.max(1);
        self.resync(store);
    }
}
