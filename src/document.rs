pub mod cel;
pub mod layer;
pub mod sprite;
pub mod stock;

use crate::document::sprite::Sprite;
use crate::journal::history::UndoHistory;
use crate::raster::surface::Surface;

#[derive(Debug)]
/// An editable document: a [`Sprite`] paired with its [`UndoHistory`] and a
/// transient rendered-overlay cache.
///
/// The sprite and the journal live side by side in one owner so that journal
/// replay can mutate the sprite while both are reachable through a single
/// `&mut Document` (the borrow is split across the two fields).
pub struct Document {
    pub(crate) sprite: Sprite,
    pub(crate) history: UndoHistory,
    pub(crate) overlay: Option<Surface>,
}

impl Document {
    /// Wrap a sprite in a fresh document with an empty journal.
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            history: UndoHistory::new(),
            overlay: None,
        }
    }

    /// The document's sprite.
    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// The document's undo/redo journal.
    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Enable or disable journaling. Must not be called while a transaction
    /// is open.
    pub fn set_journal_enabled(&mut self, enabled: bool) {
        self.history.set_enabled(enabled);
    }

    /// Undo the most recently committed group. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Self { sprite, history, .. } = self;
        history.undo_group(sprite)
    }

    /// Redo the most recently undone group. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Self { sprite, history, .. } = self;
        history.redo_group(sprite)
    }

    /// The cached rendered overlay, if one is set.
    pub fn overlay(&self) -> Option<&Surface> {
        self.overlay.as_ref()
    }

    /// Install or clear the rendered-overlay cache. The cache is invalidated
    /// automatically by operations that change the sprite's color mode.
    pub fn set_overlay(&mut self, overlay: Option<Surface>) {
        self.overlay = overlay;
    }
}
