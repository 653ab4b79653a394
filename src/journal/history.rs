use crate::document::sprite::Sprite;
use crate::journal::record::Record;

#[derive(Clone, Debug)]
/// One labeled, atomically-replayed run of journal records.
pub struct Group {
    label: String,
    records: Vec<Record>,
}

impl Group {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            records: Vec::new(),
        }
    }

    /// The user-visible label this group was opened with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The group's records, in the order they were logged.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

#[derive(Debug)]
/// The undo/redo journal of one document.
///
/// Records are grouped into labeled groups, one per user-visible action;
/// replay of a group walks its records in strict LIFO order. Only the most
/// recently committed group is eligible for undo (single linear stack, no
/// branching). Misuse (recording with no open group, opening a second group,
/// closing a group that is not open) is a programming error and panics.
pub struct UndoHistory {
    enabled: bool,
    open: Option<Group>,
    committed: Vec<Group>,
    redoable: Vec<Group>,
}

impl UndoHistory {
    /// A fresh, enabled journal with no history.
    pub fn new() -> Self {
        Self {
            enabled: true,
            open: None,
            committed: Vec::new(),
            redoable: Vec::new(),
        }
    }

    /// True unless journaling is globally disabled (it is force-disabled
    /// while a replay is in flight, to avoid recursive logging).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable journaling. Must not be toggled while a group is
    /// open, since a half-logged group could not be replayed.
    pub fn set_enabled(&mut self, enabled: bool) {
        assert!(
            self.open.is_none(),
            "cannot toggle journaling while a group is open"
        );
        self.enabled = enabled;
    }

    /// True while a group is open.
    pub fn has_open_group(&self) -> bool {
        self.open.is_some()
    }

    /// Open a new group. At most one group may be open per document.
    pub fn begin_group(&mut self, label: &str) {
        assert!(self.open.is_none(), "a journal group is already open");
        tracing::trace!(label, "journal group opened");
        self.open = Some(Group::new(label));
    }

    /// Close the open group and append it to the committed sequence.
    /// Committing a new group discards any pending redo history.
    pub fn end_group(&mut self) {
        let group = self.open.take().expect("no open journal group to close");
        tracing::trace!(
            label = group.label.as_str(),
            records = group.records.len(),
            "journal group closed"
        );
        self.clear_redo();
        self.committed.push(group);
    }

    /// Append one inverse record to the open group. Must be called before
    /// the forward mutation it reverses is applied to the document.
    pub fn record(&mut self, record: Record) {
        self.open
            .as_mut()
            .expect("record requires an open journal group")
            .records
            .push(record);
    }

    /// Number of committed groups available to undo.
    pub fn undo_depth(&self) -> usize {
        self.committed.len()
    }

    /// Number of undone groups available to redo.
    pub fn redo_depth(&self) -> usize {
        self.redoable.len()
    }

    /// Label of the group `undo_group` would replay next.
    pub fn undo_label(&self) -> Option<&str> {
        self.committed.last().map(|g| g.label())
    }

    /// Label of the group `redo_group` would replay next.
    pub fn redo_label(&self) -> Option<&str> {
        self.redoable.last().map(|g| g.label())
    }

    /// Pop the most recently committed group and replay it backward against
    /// the sprite, moving it to the redo stack. Returns `false` when there is
    /// nothing to undo.
    #[tracing::instrument(skip(self, sprite))]
    pub fn undo_group(&mut self, sprite: &mut Sprite) -> bool {
        assert!(self.open.is_none(), "cannot undo while a group is open");
        let Some(group) = self.committed.pop() else {
            return false;
        };
        tracing::debug!(label = group.label.as_str(), "undoing group");
        let redo = self.replay(group, sprite);
        self.redoable.push(redo);
        true
    }

    /// Pop the most recently undone group and replay it against the sprite,
    /// moving it back to the committed stack. Returns `false` when there is
    /// nothing to redo.
    #[tracing::instrument(skip(self, sprite))]
    pub fn redo_group(&mut self, sprite: &mut Sprite) -> bool {
        assert!(self.open.is_none(), "cannot redo while a group is open");
        let Some(group) = self.redoable.pop() else {
            return false;
        };
        tracing::debug!(label = group.label.as_str(), "redoing group");
        let undo = self.replay(group, sprite);
        self.committed.push(undo);
        true
    }

    /// Discard the redo stack irrecoverably. Called on rollback of an
    /// abandoned transaction; committing a new group does the same.
    pub fn clear_redo(&mut self) {
        if !self.redoable.is_empty() {
            tracing::debug!(groups = self.redoable.len(), "redo history discarded");
            self.redoable.clear();
        }
    }

    /// Replay a group's records in LIFO order, collecting the inverse group.
    /// Journaling is suppressed for the duration.
    ///
    /// The inverses are kept in capture (application) order, so replaying the
    /// returned group (again last-record-first) applies them in exactly the
    /// opposite order, which is what makes undo/redo involutive.
    fn replay(&mut self, group: Group, sprite: &mut Sprite) -> Group {
        let was_enabled = self.enabled;
        self.enabled = false;
        let inverse: Vec<Record> = group
            .records
            .into_iter()
            .rev()
            .map(|record| record.replay(sprite))
            .collect();
        self.enabled = was_enabled;
        Group {
            label: group.label,
            records: inverse,
        }
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journal/history.rs"]
mod tests;
