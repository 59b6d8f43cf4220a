use std::fmt::Debug;

use crate::commands;
use crate::model::{ImageDocument, PixelBuffer};

use super::{DocumentEvent, EditOutcome};

/// A live preview of one operation on one document.
///
/// The session owns the document until [`EditSession::end`] hands it back,
/// so no second session can target the same document. Every recompute reads
/// from the buffer captured at [`EditSession::begin`], never from the
/// previous preview.
#[derive(Debug)]
pub struct EditSession {
    operation: &'static str,
    document: ImageDocument,
    backup: PixelBuffer,
    areas_measured: bool,
    committed: bool,
}

impl EditSession {
    pub fn begin(operation: &'static str, mut document: ImageDocument) -> Self {
        document.backup();
        let backup = document.current().clone();
        tracing::info!(
            operation,
            document = document.title(),
            rows = backup.rows(),
            cols = backup.cols(),
            "edit session started"
        );
        Self {
            operation,
            areas_measured: document.areas_measured(),
            document,
            backup,
            committed: false,
        }
    }

    /// Runs `transform` on the backup and shows the result. On error the
    /// previous preview stays in place.
    pub fn recompute<P, F>(&mut self, transform: F, params: &P) -> commands::Result<DocumentEvent>
    where
        P: Debug + ?Sized,
        F: FnOnce(&PixelBuffer, &P) -> commands::Result<PixelBuffer>,
    {
        tracing::debug!(operation = self.operation, ?params, "recompute");
        let output = transform(&self.backup, params)?;
        self.document.set_current(output);
        Ok(DocumentEvent::Previewed {
            operation: self.operation,
        })
    }

    pub fn confirm(&mut self) {
        self.committed = true;
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn document(&self) -> &ImageDocument {
        &self.document
    }

    pub fn backup(&self) -> &PixelBuffer {
        &self.backup
    }

    /// Keeps the last preview (`commit`) or restores the backup, and returns
    /// the document with the single `Updated` event for this edit.
    pub fn end(self, commit: bool) -> (ImageDocument, DocumentEvent) {
        let Self {
            operation,
            mut document,
            backup,
            areas_measured,
            ..
        } = self;

        let outcome = if commit {
            EditOutcome::Committed
        } else {
            document.set_current(backup);
            if areas_measured {
                document.mark_areas_measured();
            }
            EditOutcome::RolledBack
        };
        tracing::info!(operation, ?outcome, "edit session ended");
        (document, DocumentEvent::Updated { operation, outcome })
    }

    /// Ends the session with whatever [`EditSession::confirm`] decided.
    pub fn close(self) -> (ImageDocument, DocumentEvent) {
        let commit = self.committed;
        self.end(commit)
    }
}
