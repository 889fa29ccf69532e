use super::document::{Change, Document, Line, Selection, Transaction};

/// Line comment marker of the HDL.
pub const COMMENT_MARKER: char = '#';

/// Direction chosen by [`toggle_hash_comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDirection {
    Comment,
    Uncomment,
}

/// Outcome of a toggle: what was done and where the selection ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub direction: ToggleDirection,
    pub lines: usize,
    pub selection: Selection,
}

/// Toggles a `#` line comment on every line touched by `selection`.
///
/// If every covered line starts with `#` after its indentation, the first `#`
/// of each line is removed (wherever it is in the line). Otherwise a `#` is
/// inserted at column 0 of every covered line, including lines that are
/// already commented. All edits form one transaction, so a single undo
/// reverts the toggle.
pub fn toggle_hash_comment(doc: &mut Document, selection: Selection) -> ToggleOutcome {
    let selection = doc.clamp(selection);
    let start = doc.line_at(selection.from).number;
    let end = doc.line_at(selection.to).number;

    let lines: Vec<Line> = (start..=end).filter_map(|n| doc.line(n)).collect();

    let direction = if lines.iter().all(is_commented) {
        ToggleDirection::Uncomment
    } else {
        ToggleDirection::Comment
    };

    let changes = lines
        .iter()
        .filter_map(|line| match direction {
            ToggleDirection::Uncomment => line
                .text
                .chars()
                .position(|c| c == COMMENT_MARKER)
                .map(|column| Change::delete(line.from + column, line.from + column + 1)),
            ToggleDirection::Comment => {
                Some(Change::insert(line.from, COMMENT_MARKER.to_string()))
            }
        })
        .collect();

    let transaction = Transaction::new(changes);
    let mapped = transaction.map_selection(selection);
    doc.apply(transaction);

    tracing::debug!(
        ?direction,
        first_line = start,
        last_line = end,
        "Toggled line comments"
    );

    ToggleOutcome {
        direction,
        lines: lines.len(),
        selection: mapped,
    }
}

/// Toggles comments on the inclusive 1-based line range `[first, last]`.
///
/// Line numbers past the end of the document are clamped to the last line.
pub fn toggle_hash_comment_lines(doc: &mut Document, first: usize, last: usize) -> ToggleOutcome {
    let last_line = doc.line_count();
    let first = first.clamp(1, last_line);
    let last = last.clamp(first, last_line);

    let from = doc.line(first).map(|l| l.from).unwrap_or_default();
    let to = doc.line(last).map(|l| l.to).unwrap_or_default();
    toggle_hash_comment(doc, Selection::new(from, to))
}

fn is_commented(line: &Line) -> bool {
    line.text.trim_start().starts_with(COMMENT_MARKER)
}
