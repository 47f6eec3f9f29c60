use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::search::{Match, SearchState};

use super::{EditError, Line, LineId, StoreError};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    line: Option<Line>,
}

/// The owning container of all lines for one open file.
///
/// Lines form a chain from [`head`](Self::head) through their `next`
/// links. The chain is never empty, and `current` always resolves to a
/// live line.
pub struct LineStore {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: LineId,
    current: LineId,
    num_lines: usize,
    modified: bool,
    path: PathBuf,
    search: Option<SearchState>,
}

impl LineStore {
    /// Create a store holding a single empty line.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::from_records(path.into(), Vec::new())
    }

    /// Create a store from file content, one line per `\n`-terminated record.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let records = bytes
            .split_inclusive(|&b| b == b'\n')
            .map(<[u8]>::to_vec)
            .collect();
        Self::from_records(path.into(), records)
    }

    /// Load the file at `path`.
    ///
    /// A missing file yields a store with one empty line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] for any failure other than the file not existing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => {
                let store = Self::from_bytes(path, &bytes);
                tracing::debug!(path = %path.display(), lines = store.num_lines, "loaded file");
                Ok(store)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "new file");
                Ok(Self::empty(path))
            }
            Err(source) => Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn from_records(path: PathBuf, mut records: Vec<Vec<u8>>) -> Self {
        if records.is_empty() {
            records.push(Vec::new());
        }
        let count = records.len();
        let slots = records
            .into_iter()
            .enumerate()
            .map(|(i, text)| Slot {
                generation: 0,
                line: Some(Line {
                    text,
                    prev: i.checked_sub(1).map(|p| LineId::new(p, 0)),
                    next: (i + 1 < count).then(|| LineId::new(i + 1, 0)),
                }),
            })
            .collect();
        let head = LineId::new(0, 0);
        Self {
            slots,
            free: Vec::new(),
            head,
            current: head,
            num_lines: count,
            modified: false,
            path,
            search: None,
        }
    }

    // --- Queries ---

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.line.as_ref())
    }

    fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.line.as_mut())
    }

    /// Whether `id` still refers to a line in the chain.
    pub fn contains(&self, id: LineId) -> bool {
        self.line(id).is_some()
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.line(id)?.next
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.line(id)?.prev
    }

    pub const fn head(&self) -> LineId {
        self.head
    }

    pub fn last(&self) -> LineId {
        self.iter().last().map_or(self.head, |(id, _)| id)
    }

    pub const fn current(&self) -> LineId {
        self.current
    }

    /// The current line. Always present.
    pub fn current_line(&self) -> &Line {
        // current is repointed before any line it names is freed
        self.line(self.current)
            .or_else(|| self.line(self.head))
            .unwrap_or(&EMPTY_LINE)
    }

    /// Make `id` the current line. Returns `false` for a stale handle.
    pub fn set_current(&mut self, id: LineId) -> bool {
        if self.contains(id) {
            self.current = id;
            true
        } else {
            false
        }
    }

    pub const fn num_lines(&self) -> usize {
        self.num_lines
    }

    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name of the buffer (the file name).
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().to_string(),
        )
    }

    /// Iterate the chain from the head.
    pub fn iter(&self) -> Lines<'_> {
        self.iter_from(self.head)
    }

    /// Iterate the chain starting at `id`.
    pub fn iter_from(&self, id: LineId) -> Lines<'_> {
        Lines {
            store: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Zero-based position of `id` in the chain.
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.iter().position(|(line, _)| line == id)
    }

    /// Handle of the line at zero-based position `index`.
    pub fn nth(&self, index: usize) -> Option<LineId> {
        self.iter().nth(index).map(|(id, _)| id)
    }

    /// Concatenation of every line, in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.iter().flat_map(|(_, line)| line.text()).copied().collect()
    }

    // --- Chain edits ---

    fn alloc(&mut self, line: Line) -> LineId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.line = Some(line);
            LineId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                line: Some(line),
            });
            LineId::new(self.slots.len() - 1, 0)
        }
    }

    fn release(&mut self, id: LineId) -> Option<Line> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())?;
        let line = slot.line.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        Some(line)
    }

    /// Splice a new line holding `content` after `after`, or at the head when
    /// `after` is `None`.
    pub fn insert_line(&mut self, after: Option<LineId>, content: Vec<u8>) -> LineId {
        let after = after.filter(|id| self.contains(*id));
        let (prev, next) = match after {
            Some(prev) => (Some(prev), self.next(prev)),
            None => (None, Some(self.head)),
        };
        let id = self.alloc(Line {
            text: content,
            prev,
            next,
        });
        if let Some(line) = prev.and_then(|p| self.line_mut(p)) {
            line.next = Some(id);
        } else {
            self.head = id;
        }
        if let Some(line) = next.and_then(|n| self.line_mut(n)) {
            line.prev = Some(id);
        }
        self.num_lines += 1;
        self.modified = true;
        id
    }

    /// Remove `line` from the chain and return its text.
    ///
    /// If `line` was current, current moves to its successor, falling back
    /// to its predecessor. Removing the sole line leaves one fresh empty line.
    pub fn unlink_line(&mut self, id: LineId) -> Option<Vec<u8>> {
        let removed = self.release(id)?;
        if let Some(line) = removed.prev.and_then(|p| self.line_mut(p)) {
            line.next = removed.next;
        }
        if let Some(line) = removed.next.and_then(|n| self.line_mut(n)) {
            line.prev = removed.prev;
        }
        if self.head == id {
            if let Some(next) = removed.next {
                self.head = next;
            }
        }
        self.num_lines -= 1;
        self.modified = true;

        if self.num_lines == 0 {
            let fresh = self.alloc(Line::default());
            self.head = fresh;
            self.current = fresh;
            self.num_lines = 1;
        } else if self.current == id {
            self.current = removed.next.or(removed.prev).unwrap_or(self.head);
        }
        tracing::debug!(lines = self.num_lines, "unlinked line");
        Some(removed.text)
    }

    /// Split `line` at `at_column`, moving the remainder into a new line
    /// right after it. The original line is given the same terminator the
    /// remainder carries (`\n` when the line had none).
    ///
    /// # Errors
    ///
    /// [`EditError::NoOp`] when `at_column` is at or past the end of the
    /// text, or inside a `\r\n` terminator.
    pub fn split_line(&mut self, id: LineId, at_column: usize) -> Result<LineId, EditError> {
        let line = self.line_mut(id).ok_or(EditError::NoOp)?;
        if at_column >= line.text.len() || at_column > line.end_column() {
            return Err(EditError::NoOp);
        }
        let terminator = match line.terminator() {
            [] => b"\n".to_vec(),
            bytes => bytes.to_vec(),
        };
        let tail = line.text.split_off(at_column);
        line.text.extend_from_slice(&terminator);
        tracing::debug!(at_column, "split line");
        Ok(self.insert_line(Some(id), tail))
    }

    /// Append `line` to its predecessor, dropping the predecessor's
    /// terminator, and free it. The predecessor becomes current.
    ///
    /// # Errors
    ///
    /// [`EditError::NoOp`] for the first line.
    pub fn merge_line(&mut self, id: LineId) -> Result<LineId, EditError> {
        let prev = self.prev(id).ok_or(EditError::NoOp)?;
        let tail = self.unlink_line(id).ok_or(EditError::NoOp)?;
        let line = self.line_mut(prev).ok_or(EditError::NoOp)?;
        let end = line.end_column();
        line.text.truncate(end);
        line.text.extend_from_slice(&tail);
        self.current = prev;
        tracing::debug!("merged line into previous");
        Ok(prev)
    }

    // --- Character edits ---

    /// Insert `ch` before byte `at_column`.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] when `at_column` is past the end of the text.
    pub fn insert_char(&mut self, id: LineId, at_column: usize, ch: char) -> Result<(), EditError> {
        let line = self.line_mut(id).ok_or(EditError::OutOfRange)?;
        if at_column > line.text.len() {
            return Err(EditError::OutOfRange);
        }
        let mut encoded = [0u8; 4];
        let bytes = ch.encode_utf8(&mut encoded).as_bytes();
        line.text.splice(at_column..at_column, bytes.iter().copied());
        self.modified = true;
        Ok(())
    }

    /// Delete the character starting at byte `at_column`, all of its UTF-8
    /// bytes. The final byte of a line and any part of its terminator are
    /// never deleted here; use [`merge_line`](Self::merge_line).
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] when `at_column >= len - 1` or the column
    /// falls on the terminator.
    pub fn delete_char(&mut self, id: LineId, at_column: usize) -> Result<(), EditError> {
        let line = self.line_mut(id).ok_or(EditError::OutOfRange)?;
        let end = line.end_column();
        if at_column + 1 >= line.text.len() || at_column >= end {
            return Err(EditError::OutOfRange);
        }
        let next = line.next_boundary(at_column).min(end);
        line.text.drain(at_column..next);
        self.modified = true;
        Ok(())
    }

    /// Cut the text of `line` at `at_column`, returning the removed tail.
    ///
    /// # Errors
    ///
    /// [`EditError::NoOp`] when there is nothing at or past `at_column`.
    pub fn truncate_line(&mut self, id: LineId, at_column: usize) -> Result<Vec<u8>, EditError> {
        let line = self.line_mut(id).ok_or(EditError::NoOp)?;
        if at_column >= line.text.len() {
            return Err(EditError::NoOp);
        }
        let tail = line.text.split_off(at_column);
        self.modified = true;
        Ok(tail)
    }

    // --- Current-line helpers ---

    /// Split the current line and make the new line current.
    ///
    /// # Errors
    ///
    /// See [`split_line`](Self::split_line).
    pub fn split_current_line(&mut self, at_column: usize) -> Result<LineId, EditError> {
        let id = self.split_line(self.current, at_column)?;
        self.current = id;
        Ok(id)
    }

    /// Merge the current line into the previous one.
    ///
    /// # Errors
    ///
    /// See [`merge_line`](Self::merge_line).
    pub fn merge_current_line(&mut self) -> Result<LineId, EditError> {
        self.merge_line(self.current)
    }

    /// Remove the current line; its successor (or predecessor) becomes current.
    pub fn delete_current_line(&mut self) -> Vec<u8> {
        self.unlink_line(self.current).unwrap_or_default()
    }

    /// Open an empty line after `id` and make it current.
    ///
    /// An unterminated line gets a `\n` first and the new line stays
    /// unterminated, so the file's final-newline convention is kept.
    pub fn open_line_after(&mut self, id: LineId) -> LineId {
        let content = match self.line_mut(id) {
            Some(line) if !line.is_terminated() => {
                line.text.push(b'\n');
                Vec::new()
            }
            _ => b"\n".to_vec(),
        };
        let new = self.insert_line(Some(id), content);
        self.current = new;
        new
    }

    // --- Persistence ---

    /// Write every line, in order and verbatim, to the store's path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file can't be created or written;
    /// the modified flag is left unchanged.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        for (_, line) in self.iter() {
            writer.write_all(line.text()).map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;
        self.modified = false;
        tracing::debug!(path = %self.path.display(), lines = self.num_lines, "saved file");
        Ok(())
    }

    // --- Search ---

    /// Replace any active search and scan forward from `from_line` inclusive.
    pub fn start_search(&mut self, pattern: &str, from_line: usize) -> Option<Match> {
        let mut state = SearchState::new(pattern, from_line);
        let found = state.advance(self);
        self.search = Some(state);
        found
    }

    /// Continue the active search on the lines after the last match.
    pub fn search_next(&mut self) -> Option<Match> {
        let mut state = self.search.take()?;
        let found = state.next(self);
        self.search = Some(state);
        found
    }

    /// Continue the active search on the lines before the last match.
    pub fn search_previous(&mut self) -> Option<Match> {
        let mut state = self.search.take()?;
        let found = state.previous(self);
        self.search = Some(state);
        found
    }

    pub const fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }
}

static EMPTY_LINE: Line = Line::new(Vec::new());

impl std::fmt::Debug for LineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStore")
            .field("path", &self.path)
            .field("num_lines", &self.num_lines)
            .field("current", &self.current)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

/// Iterator over `(LineId, &Line)` pairs following `next` links.
#[derive(Debug)]
pub struct Lines<'a> {
    store: &'a LineStore,
    next: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let line = self.store.line(id)?;
        self.next = line.next;
        Some((id, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> LineStore {
        LineStore::from_bytes(
            "sample.txt",
            b"hello world\nhow are you\nhope all is well\n",
        )
    }

    fn texts(store: &LineStore) -> Vec<String> {
        store
            .iter()
            .map(|(_, line)| String::from_utf8_lossy(line.text()).to_string())
            .collect()
    }

    fn assert_chain_consistent(store: &LineStore) {
        let mut prev: Option<LineId> = None;
        let mut count = 0;
        for (id, line) in store.iter() {
            assert_eq!(line.prev(), prev, "prev link out of sync");
            if let Some(p) = prev {
                assert_eq!(store.next(p), Some(id), "next link out of sync");
            }
            prev = Some(id);
            count += 1;
            assert!(count <= store.slots.len(), "cycle in chain");
        }
        assert_eq!(count, store.num_lines());
        assert!(store.contains(store.current()));
        assert!(store.line(store.head()).unwrap().prev().is_none());
    }

    // --- Construction ---

    #[test]
    fn test_from_bytes_one_line_per_record() {
        let store = sample();
        assert_eq!(store.num_lines(), 3);
        assert_eq!(
            texts(&store),
            vec!["hello world\n", "how are you\n", "hope all is well\n"]
        );
        assert!(!store.is_modified());
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_from_bytes_keeps_unterminated_last_line() {
        let store = LineStore::from_bytes("t", b"one\ntwo");
        assert_eq!(texts(&store), vec!["one\n", "two"]);
    }

    #[test]
    fn test_from_bytes_preserves_crlf() {
        let store = LineStore::from_bytes("t", b"one\r\ntwo\r\n");
        assert_eq!(store.to_bytes(), b"one\r\ntwo\r\n");
        assert_eq!(store.num_lines(), 2);
    }

    #[test]
    fn test_empty_has_one_empty_line() {
        let store = LineStore::empty("new.txt");
        assert_eq!(store.num_lines(), 1);
        assert_eq!(store.current_line().text(), b"");
        assert!(!store.is_modified());
    }

    #[test]
    fn test_load_missing_file_gives_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LineStore::load(dir.path().join("nope.txt")).unwrap();
        assert_eq!(store.num_lines(), 1);
        assert_eq!(store.current_line().text(), b"");
        assert!(!store.is_modified());
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_name_is_file_name() {
        let store = LineStore::empty("/tmp/some/notes.txt");
        assert_eq!(store.name(), "notes.txt");
    }

    // --- insert_line ---

    #[test]
    fn test_insert_line_after_middle() {
        let mut store = sample();
        let first = store.head();
        let id = store.insert_line(Some(first), b"inserted\n".to_vec());
        assert_eq!(store.index_of(id), Some(1));
        assert_eq!(store.prev(id), Some(first));
        assert_eq!(store.next(first), Some(id));
        assert_eq!(store.num_lines(), 4);
        assert!(store.is_modified());
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_insert_line_at_head() {
        let mut store = sample();
        let old_head = store.head();
        let id = store.insert_line(None, b"top\n".to_vec());
        assert_eq!(store.head(), id);
        assert_eq!(store.next(id), Some(old_head));
        assert_eq!(store.prev(old_head), Some(id));
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_insert_line_after_last() {
        let mut store = sample();
        let last = store.last();
        let id = store.insert_line(Some(last), b"tail".to_vec());
        assert_eq!(store.last(), id);
        assert_eq!(store.next(id), None);
        assert_chain_consistent(&store);
    }

    // --- split_line ---

    #[test]
    fn test_split_line_scenario() {
        let mut store = sample();
        let first = store.head();
        let new = store.split_line(first, 5).unwrap();
        assert_eq!(store.line(first).unwrap().text(), b"hello\n");
        assert_eq!(store.line(new).unwrap().text(), b" world\n");
        assert_eq!(store.index_of(new), Some(1));
        assert_eq!(store.num_lines(), 4);
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_split_line_past_end_is_noop() {
        let mut store = sample();
        let first = store.head();
        assert_eq!(store.split_line(first, 12), Err(EditError::NoOp));
        assert_eq!(store.split_line(first, 100), Err(EditError::NoOp));
        assert_eq!(store.num_lines(), 3);
        assert!(!store.is_modified());
    }

    #[test]
    fn test_split_line_at_newline_opens_empty_line() {
        let mut store = sample();
        let first = store.head();
        let new = store.split_line(first, 11).unwrap();
        assert_eq!(store.line(first).unwrap().text(), b"hello world\n");
        assert_eq!(store.line(new).unwrap().text(), b"\n");
    }

    #[test]
    fn test_split_line_keeps_crlf_terminator() {
        let mut store = LineStore::from_bytes("t", b"hello world\r\n");
        let first = store.head();
        let new = store.split_line(first, 5).unwrap();
        assert_eq!(store.line(first).unwrap().text(), b"hello\r\n");
        assert_eq!(store.line(new).unwrap().text(), b" world\r\n");

        let end = store.split_line(new, 6).unwrap();
        assert_eq!(store.line(end).unwrap().text(), b"\r\n");
        assert_eq!(store.split_line(end, 1), Err(EditError::NoOp));
        assert_eq!(store.to_bytes(), b"hello\r\n world\r\n\r\n");
    }

    #[test]
    fn test_split_current_line_moves_current() {
        let mut store = sample();
        let new = store.split_current_line(5).unwrap();
        assert_eq!(store.current(), new);
    }

    // --- merge_line ---

    #[test]
    fn test_merge_line_joins_into_previous() {
        let mut store = sample();
        let second = store.nth(1).unwrap();
        store.set_current(second);
        let prev = store.merge_line(second).unwrap();
        assert_eq!(prev, store.head());
        assert_eq!(store.line(prev).unwrap().text(), b"hello worldhow are you\n");
        assert_eq!(store.current(), prev);
        assert!(!store.contains(second));
        assert_eq!(store.num_lines(), 2);
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_merge_line_drops_crlf_terminator() {
        let mut store = LineStore::from_bytes("t", b"one\r\ntwo\r\n");
        let second = store.nth(1).unwrap();
        let prev = store.merge_line(second).unwrap();
        assert_eq!(store.line(prev).unwrap().text(), b"onetwo\r\n");
    }

    #[test]
    fn test_merge_first_line_is_noop() {
        let mut store = sample();
        assert_eq!(store.merge_line(store.head()), Err(EditError::NoOp));
        assert_eq!(store.num_lines(), 3);
    }

    #[test]
    fn test_split_then_merge_round_trip() {
        let mut store = sample();
        let original = store.to_bytes();
        let new = store.split_line(store.head(), 5).unwrap();
        store.merge_line(new).unwrap();
        assert_eq!(store.to_bytes(), original);
        assert_chain_consistent(&store);
    }

    // --- insert_char / delete_char ---

    #[test]
    fn test_insert_char_shifts_right() {
        let mut store = sample();
        let first = store.head();
        store.insert_char(first, 5, ',').unwrap();
        assert_eq!(store.line(first).unwrap().text(), b"hello, world\n");
        assert!(store.is_modified());
    }

    #[test]
    fn test_insert_char_at_len_appends() {
        let mut store = LineStore::from_bytes("t", b"abc");
        store.insert_char(store.head(), 3, 'd').unwrap();
        assert_eq!(store.current_line().text(), b"abcd");
    }

    #[test]
    fn test_insert_char_past_len_is_out_of_range() {
        let mut store = sample();
        assert_eq!(
            store.insert_char(store.head(), 13, 'x'),
            Err(EditError::OutOfRange)
        );
        assert!(!store.is_modified());
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut store = LineStore::from_bytes("t", b"caf\n");
        store.insert_char(store.head(), 3, '\u{e9}').unwrap();
        assert_eq!(store.current_line().text(), "caf\u{e9}\n".as_bytes());
    }

    #[test]
    fn test_delete_char_shifts_left() {
        let mut store = sample();
        let first = store.head();
        store.delete_char(first, 0).unwrap();
        assert_eq!(store.line(first).unwrap().text(), b"ello world\n");
        assert!(store.is_modified());
    }

    #[test]
    fn test_delete_char_never_deletes_terminator() {
        let mut store = sample();
        let before = store.to_bytes();
        assert_eq!(store.delete_char(store.head(), 11), Err(EditError::OutOfRange));
        assert_eq!(store.delete_char(store.head(), 50), Err(EditError::OutOfRange));
        assert_eq!(store.to_bytes(), before);
        assert!(!store.is_modified());
    }

    #[test]
    fn test_delete_char_removes_whole_multibyte_char() {
        let mut store = LineStore::from_bytes("t", "\u{e9}t\n".as_bytes());
        store.delete_char(store.head(), 0).unwrap();
        assert_eq!(store.current_line().text(), b"t\n");
    }

    #[test]
    fn test_delete_char_never_deletes_carriage_return() {
        let mut store = LineStore::from_bytes("t", b"one\r\n");
        assert_eq!(store.delete_char(store.head(), 3), Err(EditError::OutOfRange));
        assert_eq!(store.to_bytes(), b"one\r\n");
    }

    #[test]
    fn test_delete_char_on_empty_line_is_out_of_range() {
        let mut store = LineStore::empty("t");
        assert_eq!(store.delete_char(store.head(), 0), Err(EditError::OutOfRange));
    }

    #[test]
    fn test_truncate_line_returns_tail() {
        let mut store = LineStore::from_bytes("t", b"abc");
        let tail = store.truncate_line(store.head(), 2).unwrap();
        assert_eq!(tail, b"c");
        assert_eq!(store.current_line().text(), b"ab");
        assert_eq!(store.truncate_line(store.head(), 2), Err(EditError::NoOp));
    }

    // --- unlink_line ---

    #[test]
    fn test_unlink_middle_line_repairs_links() {
        let mut store = sample();
        let second = store.nth(1).unwrap();
        let text = store.unlink_line(second).unwrap();
        assert_eq!(text, b"how are you\n");
        assert_eq!(
            texts(&store),
            vec!["hello world\n", "hope all is well\n"]
        );
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_unlink_head_moves_head() {
        let mut store = sample();
        let first = store.head();
        store.unlink_line(first);
        assert_eq!(store.line(store.head()).unwrap().text(), b"how are you\n");
        assert_eq!(store.index_of(store.current()), Some(0));
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_delete_current_last_line_falls_back_to_prev() {
        let mut store = sample();
        let last = store.last();
        store.set_current(last);
        store.delete_current_line();
        assert_eq!(store.current(), store.last());
        assert_eq!(store.index_of(store.current()), Some(1));
    }

    #[test]
    fn test_deleting_every_line_leaves_one_empty_line() {
        let mut store = sample();
        for _ in 0..3 {
            store.delete_current_line();
        }
        assert_eq!(store.num_lines(), 1);
        assert_eq!(store.current_line().text(), b"");
        assert_eq!(store.current(), store.head());
        assert_chain_consistent(&store);
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut store = sample();
        let second = store.nth(1).unwrap();
        store.unlink_line(second);
        let reused = store.insert_line(Some(store.head()), b"new\n".to_vec());
        assert!(!store.contains(second));
        assert!(store.contains(reused));
        assert!(store.line(second).is_none());
        assert!(!store.set_current(second));
    }

    // --- open_line_after ---

    #[test]
    fn test_open_line_after_terminated_line() {
        let mut store = sample();
        let new = store.open_line_after(store.head());
        assert_eq!(store.current(), new);
        assert_eq!(store.line(new).unwrap().text(), b"\n");
        assert_eq!(store.index_of(new), Some(1));
    }

    #[test]
    fn test_open_line_after_unterminated_line_keeps_convention() {
        let mut store = LineStore::from_bytes("t", b"abc");
        store.open_line_after(store.head());
        assert_eq!(store.to_bytes(), b"abc\n");
        assert_eq!(store.num_lines(), 2);
    }

    // --- save ---

    #[test]
    fn test_save_clears_modified_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, "hello world\nhow are you\nhope all is well\n").unwrap();

        let mut store = LineStore::load(&path).unwrap();
        store.insert_char(store.head(), 0, '>').unwrap();
        assert!(store.is_modified());
        store.save().unwrap();
        assert!(!store.is_modified());

        let reloaded = LineStore::load(&path).unwrap();
        assert_eq!(reloaded.to_bytes(), store.to_bytes());
        assert_eq!(
            std::fs::read(&path).unwrap(),
            b">hello world\nhow are you\nhope all is well\n"
        );
    }

    #[test]
    fn test_save_failure_keeps_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LineStore::empty(dir.path().join("missing").join("file.txt"));
        store.insert_char(store.head(), 0, 'x').unwrap();
        let err = store.save().unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(store.is_modified());
    }

    // --- search state ---

    #[test]
    fn test_start_search_replaces_previous_state() {
        let mut store = sample();
        store.start_search("hello", 0);
        let found = store.start_search("are", 0).unwrap();
        assert_eq!((found.line, found.column), (1, 4));
        assert_eq!(store.search().unwrap().pattern(), b"are");
        store.clear_search();
        assert!(store.search().is_none());
        assert!(store.search_next().is_none());
    }

    mod property_tests {
        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(usize),
            Split(usize, usize),
            Merge(usize),
            Unlink(usize),
            InsertChar(usize, usize),
            DeleteChar(usize, usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..20usize).prop_map(Op::Insert),
                (0..20usize, 0..20usize).prop_map(|(l, c)| Op::Split(l, c)),
                (0..20usize).prop_map(Op::Merge),
                (0..20usize).prop_map(Op::Unlink),
                (0..20usize, 0..20usize).prop_map(|(l, c)| Op::InsertChar(l, c)),
                (0..20usize, 0..20usize).prop_map(|(l, c)| Op::DeleteChar(l, c)),
            ]
        }

        fn pick(store: &LineStore, n: usize) -> LineId {
            store.nth(n % store.num_lines()).unwrap()
        }

        proptest! {
            #[test]
            fn chain_stays_consistent(ops in prop::collection::vec(op(), 0..60)) {
                let mut store = LineStore::from_bytes("p", b"alpha\nbeta\ngamma\n");
                for op in ops {
                    match op {
                        Op::Insert(n) => {
                            let at = pick(&store, n);
                            store.insert_line(Some(at), b"x\n".to_vec());
                        }
                        Op::Split(n, c) => {
                            let _ = store.split_line(pick(&store, n), c);
                        }
                        Op::Merge(n) => {
                            let _ = store.merge_line(pick(&store, n));
                        }
                        Op::Unlink(n) => {
                            store.unlink_line(pick(&store, n));
                        }
                        Op::InsertChar(n, c) => {
                            let _ = store.insert_char(pick(&store, n), c, 'z');
                        }
                        Op::DeleteChar(n, c) => {
                            let _ = store.delete_char(pick(&store, n), c);
                        }
                    }
                    assert_chain_consistent(&store);
                    prop_assert!(store.num_lines() >= 1);
                }
            }

            #[test]
            fn split_merge_round_trip(text in "[a-z ]{0,30}(\r?\n)?", at in 0..33usize) {
                let mut store = LineStore::from_bytes("p", text.as_bytes());
                let original = store.to_bytes();
                if let Ok(new) = store.split_line(store.head(), at) {
                    store.merge_line(new).unwrap();
                }
                prop_assert_eq!(store.to_bytes(), original);
            }

            #[test]
            fn unlinking_everything_leaves_one_empty_line(count in 1..30usize) {
                let content = "line\n".repeat(count);
                let mut store = LineStore::from_bytes("p", content.as_bytes());
                for _ in 0..count {
                    store.delete_current_line();
                }
                prop_assert_eq!(store.num_lines(), 1);
                prop_assert_eq!(store.current_line().text(), b"");
            }
        }
    }
}
