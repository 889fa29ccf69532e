//! Editor document model and editing commands.

mod comment;
mod document;

pub use comment::{
    COMMENT_MARKER, ToggleDirection, ToggleOutcome, toggle_hash_comment,
    toggle_hash_comment_lines,
};
pub use document::{Change, Document, Line, Selection, Transaction};
