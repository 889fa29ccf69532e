//! Line-addressable text document with transactional edits.
//!
//! Offsets are char offsets into the whole text; line numbers are 1-based.
//! Lines are separated by `\n` and a line's range excludes the separator.

use serde::{Deserialize, Serialize};

/// A single line of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Char offset of the first character.
    pub from: usize,
    /// Char offset just past the last character (before the `\n`).
    pub to: usize,
    pub text: String,
}

/// A selection range `[from, to)`. A caret has `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
}

impl Selection {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from: from.min(to),
            to: from.max(to),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { from: at, to: at }
    }
}

/// Replace the chars in `[from, to)` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            from: at,
            to: at,
            insert: text.into(),
        }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            insert: String::new(),
        }
    }

    fn inserted_len(&self) -> usize {
        self.insert.chars().count()
    }
}

/// A group of changes applied as one step and undone as one step.
///
/// All offsets refer to the document *before* the transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    changes: Vec<Change>,
}

impl Transaction {
    /// Builds a transaction; changes are ordered by position and overlaps are
    /// trimmed so that each change starts where the previous one ended at the
    /// earliest.
    pub fn new(mut changes: Vec<Change>) -> Self {
        changes.sort_by_key(|c| (c.from, c.to));
        let mut floor = 0;
        for change in &mut changes {
            change.from = change.from.max(floor);
            change.to = change.to.max(change.from);
            floor = change.to;
        }
        Self { changes }
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Maps a position in the old document to the new one. A position at an
    /// insertion point moves past the inserted text.
    pub fn map_pos(&self, pos: usize) -> usize {
        let mut delta: isize = 0;
        for change in &self.changes {
            if change.from > pos {
                break;
            }
            if pos < change.to {
                // Inside a replaced range: land at the start of the replacement.
                return (change.from as isize + delta) as usize;
            }
            delta += change.inserted_len() as isize - (change.to - change.from) as isize;
        }
        (pos as isize + delta).max(0) as usize
    }

    pub fn map_selection(&self, selection: Selection) -> Selection {
        Selection::new(self.map_pos(selection.from), self.map_pos(selection.to))
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    forward: Transaction,
    inverse: Transaction,
}

/// Text buffer with line lookup and single-step undo/redo per transaction.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    /// Char and byte offset at which each line starts.
    line_starts: Vec<LineStart>,
    /// Length in chars.
    char_len: usize,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let (line_starts, char_len) = index_lines(&text);
        Self {
            text,
            line_starts,
            char_len,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Clamps a selection to the document bounds.
    pub fn clamp(&self, selection: Selection) -> Selection {
        let len = self.len();
        Selection::new(selection.from.min(len), selection.to.min(len))
    }

    /// Returns the line containing `offset` (clamped to the document).
    pub fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(self.len());
        let index = match self.line_starts.binary_search_by_key(&offset, |start| start.char) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at - 1,
        };
        self.build_line(index)
    }

    /// Returns the line with the given 1-based number.
    pub fn line(&self, number: usize) -> Option<Line> {
        if number == 0 || number > self.line_count() {
            return None;
        }
        Some(self.build_line(number - 1))
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.line_count()).map(|index| self.build_line(index))
    }

    /// Applies a transaction as one undoable step.
    pub fn apply(&mut self, transaction: Transaction) {
        if transaction.is_empty() {
            return;
        }
        let inverse = self.apply_raw(&transaction);
        self.undo_stack.push(HistoryEntry {
            forward: transaction,
            inverse,
        });
        self.redo_stack.clear();
    }

    /// Reverts the most recent transaction. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        self.apply_raw(&entry.inverse);
        self.redo_stack.push(entry);
        true
    }

    /// Re-applies the most recently undone transaction.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        self.apply_raw(&entry.forward);
        self.undo_stack.push(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Applies the changes and returns the transaction that reverts them.
    fn apply_raw(&mut self, transaction: &Transaction) -> Transaction {
        let len = self.len();
        let mut result = String::with_capacity(self.text.len());
        let mut inverse = Vec::with_capacity(transaction.changes.len());
        let mut chars = self.text.chars();
        let mut cursor = 0;
        let mut delta: isize = 0;

        for change in &transaction.changes {
            let from = change.from.min(len);
            let to = change.to.min(len);

            result.extend(chars.by_ref().take(from - cursor));
            let removed: String = chars.by_ref().take(to - from).collect();
            result.push_str(&change.insert);

            let new_from = (from as isize + delta) as usize;
            let inserted = change.inserted_len();
            inverse.push(Change {
                from: new_from,
                to: new_from + inserted,
                insert: removed,
            });

            delta += inserted as isize - (to - from) as isize;
            cursor = to;
        }
        result.extend(chars);

        self.text = result;
        (self.line_starts, self.char_len) = index_lines(&self.text);
        Transaction { changes: inverse }
    }

    fn build_line(&self, index: usize) -> Line {
        let start = self.line_starts[index];
        let end_byte = self
            .line_starts
            .get(index + 1)
            .map_or(self.text.len(), |next| next.byte - 1);
        let text = self.text[start.byte..end_byte].to_string();
        let to = match self.line_starts.get(index + 1) {
            Some(next) => next.char - 1,
            None => self.char_len,
        };
        Line {
            number: index + 1,
            from: start.char,
            to,
            text,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineStart {
    char: usize,
    byte: usize,
}

/// Indexes line starts in one pass; also returns the length in chars.
fn index_lines(text: &str) -> (Vec<LineStart>, usize) {
    let mut starts = vec![LineStart::default()];
    let mut char_len = 0;
    for (byte, c) in text.char_indices() {
        char_len += 1;
        if c == '\n' {
            starts.push(LineStart {
                char: char_len,
                byte: byte + 1,
            });
        }
    }
    (starts, char_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let doc = Document::new("ab\ncde\n\nf");
        assert_eq!(doc.line_count(), 4);

        let line = doc.line_at(4);
        assert_eq!(line.number, 2);
        assert_eq!(line.text, "cde");
        assert_eq!((line.from, line.to), (3, 6));

        // The newline offset belongs to the line it ends.
        assert_eq!(doc.line_at(2).number, 1);
        assert_eq!(doc.line_at(7).text, "");
        assert_eq!(doc.line(4).unwrap().text, "f");
        assert!(doc.line(0).is_none());
        assert!(doc.line(5).is_none());
    }

    #[test]
    fn test_line_at_clamps_offset() {
        let doc = Document::new("ab\ncd");
        assert_eq!(doc.line_at(100).number, 2);
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let doc = Document::new("");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_at(0).text, "");
    }

    #[test]
    fn test_apply_multiple_changes() {
        let mut doc = Document::new("a\nb\nc");
        doc.apply(Transaction::new(vec![
            Change::insert(4, "#"),
            Change::insert(0, "#"),
            Change::delete(2, 3),
        ]));
        assert_eq!(doc.text(), "#a\n\n#c");
    }

    #[test]
    fn test_undo_redo_single_step() {
        let mut doc = Document::new("a\nb");
        doc.apply(Transaction::new(vec![
            Change::insert(0, "#"),
            Change::insert(2, "#"),
        ]));
        assert_eq!(doc.text(), "#a\n#b");

        assert!(doc.undo());
        assert_eq!(doc.text(), "a\nb");
        assert!(!doc.undo());

        assert!(doc.redo());
        assert_eq!(doc.text(), "#a\n#b");
        assert!(!doc.redo());
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let mut doc = Document::new("é\nü");
        assert_eq!(doc.line(2).unwrap().from, 2);
        doc.apply(Transaction::new(vec![Change::insert(2, "#")]));
        assert_eq!(doc.text(), "é\n#ü");
    }

    #[test]
    fn test_line_offsets_survive_edits_with_multibyte_text() {
        let mut doc = Document::new("αβ\nγ\n\nδε");
        assert_eq!(doc.len(), 8);
        doc.apply(Transaction::new(vec![Change::insert(3, "#"), Change::insert(6, "#")]));

        let lines: Vec<(usize, usize, String)> =
            doc.lines().map(|l| (l.from, l.to, l.text)).collect();
        assert_eq!(
            lines,
            vec![
                (0, 2, "αβ".to_string()),
                (3, 5, "#γ".to_string()),
                (6, 6, String::new()),
                (7, 10, "#δε".to_string()),
            ]
        );
        assert_eq!(doc.len(), 10);
        assert_eq!(doc.line_at(9).number, 4);
    }

    #[test]
    fn test_large_document_toggle_is_linear() {
        let text = vec!["x = y."; 20_000].join("\n");
        let mut doc = Document::new(text);
        let started = std::time::Instant::now();
        let lines: Vec<Line> = doc.lines().collect();
        assert_eq!(lines.len(), 20_000);
        assert_eq!(lines[19_999].from, 19_999 * 7);
        doc.apply(Transaction::new(
            lines.iter().map(|l| Change::insert(l.from, "#")).collect(),
        ));
        assert!(doc.lines().all(|l| l.text == "#x = y."));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_map_selection_through_insertions() {
        let tx = Transaction::new(vec![Change::insert(0, "#"), Change::insert(3, "#")]);
        assert_eq!(tx.map_selection(Selection::new(0, 4)), Selection::new(1, 6));
    }

    #[test]
    fn test_map_pos_inside_deletion() {
        let tx = Transaction::new(vec![Change::delete(2, 5)]);
        assert_eq!(tx.map_pos(3), 2);
        assert_eq!(tx.map_pos(6), 3);
    }
}
