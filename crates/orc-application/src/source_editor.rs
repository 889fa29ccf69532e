//! Source editing use case.
//!
//! Keeps an editor [`Document`] and the session's source text in step: every
//! edit is applied to the document as one transaction and the resulting text
//! is written back to the session (and through it, to storage).

use orc_core::editor::{
    Change, Document, Selection, ToggleOutcome, Transaction, toggle_hash_comment,
    toggle_hash_comment_lines,
};
use orc_core::session::SharedSession;

pub struct SourceEditor {
    session: SharedSession,
    document: Document,
}

impl SourceEditor {
    /// Opens the editor on the session's current source text.
    pub async fn open(session: SharedSession) -> Self {
        let document = Document::new(session.lock().await.source_text());
        Self { session, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    /// Replaces the whole source, as one undoable edit.
    pub async fn replace(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.document.text() {
            return;
        }
        let change = Change {
            from: 0,
            to: self.document.len(),
            insert: text,
        };
        self.document.apply(Transaction::new(vec![change]));
        self.sync().await;
    }

    /// Toggles `#` comments on the inclusive 1-based line range.
    pub async fn toggle_comment(&mut self, first: usize, last: usize) -> ToggleOutcome {
        let outcome = toggle_hash_comment_lines(&mut self.document, first, last);
        self.sync().await;
        outcome
    }

    /// Toggles `#` comments on the lines touched by a char-offset selection.
    pub async fn toggle_comment_at(&mut self, selection: Selection) -> ToggleOutcome {
        let outcome = toggle_hash_comment(&mut self.document, selection);
        self.sync().await;
        outcome
    }

    pub async fn undo(&mut self) -> bool {
        let undone = self.document.undo();
        if undone {
            self.sync().await;
        }
        undone
    }

    pub async fn redo(&mut self) -> bool {
        let redone = self.document.redo();
        if redone {
            self.sync().await;
        }
        redone
    }

    /// Re-reads the source from the session, dropping the edit history.
    ///
    /// Used after the session was reset underneath the editor.
    pub async fn reload(&mut self) {
        self.document = Document::new(self.session.lock().await.source_text());
    }

    async fn sync(&self) {
        let mut session = self.session.lock().await;
        if session.source_text() != self.document.text() {
            session.set_source_text(self.document.text());
        }
    }
}
