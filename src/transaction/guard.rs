use crate::document::Document;
use crate::document::sprite::Sprite;
use crate::journal::record::Record;

/// Scope guard correlating one user-visible action with exactly one journal
/// group.
///
/// Construction reads the journal's enabled flag once and caches it; that
/// cached flag, never a live re-check, governs every primitive logged
/// through this transaction, so toggling the journal mid-transaction cannot
/// produce a partially-logged group.
///
/// Dropping the guard closes the group. If [`Transaction::commit`] was not
/// called first, the group is immediately replayed backward (reversing
/// everything the transaction did) and the redo history is cleared; this is
/// the defined mechanism for "undo everything attempted", not an error path.
///
/// At most one transaction may be open per document; composite operations
/// call each other as plain methods inside one enclosing transaction and
/// never open their own.
pub struct Transaction<'a> {
    doc: &'a mut Document,
    enabled: bool,
    committed: bool,
}

impl<'a> Transaction<'a> {
    /// Open a transaction over `document`, labeled for the undo history.
    pub fn new(document: &'a mut Document, label: &str) -> Self {
        let enabled = document.history.is_enabled();
        if enabled {
            document.history.begin_group(label);
        }
        tracing::debug!(label, enabled, "transaction opened");
        Self {
            doc: document,
            enabled,
            committed: false,
        }
    }

    /// Mark the transaction as committed: its group stays on the undo stack
    /// when the guard drops. Committing twice is a programming error.
    pub fn commit(&mut self) {
        assert!(!self.committed, "transaction already committed");
        self.committed = true;
    }

    /// True once [`Transaction::commit`] has been called.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Read access to the document under edit.
    pub fn document(&self) -> &Document {
        self.doc
    }

    pub(crate) fn sprite(&self) -> &Sprite {
        &self.doc.sprite
    }

    pub(crate) fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.doc.sprite
    }

    pub(crate) fn invalidate_overlay(&mut self) {
        self.doc.overlay = None;
    }

    /// Log one inverse record, honoring the cached enabled flag. Every
    /// primitive calls this before applying its forward mutation.
    pub(crate) fn push(&mut self, record: Record) {
        if self.enabled {
            self.doc.history.record(record);
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        let Document {
            sprite, history, ..
        } = &mut *self.doc;
        history.end_group();
        if self.committed {
            tracing::debug!("transaction committed");
        } else {
            tracing::debug!("transaction rolled back");
            history.undo_group(sprite);
            history.clear_redo();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/guard.rs"]
mod tests;
