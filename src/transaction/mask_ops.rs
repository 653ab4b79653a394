//! Selection-mask management.

use crate::journal::record::Record;
use crate::raster::mask::Mask;
use crate::transaction::guard::Transaction;

/// Repository slot holding the mask snapshot taken by
/// [`Transaction::deselect_mask`].
pub const DESELECTED_MASK: &str = "*deselected*";

impl Transaction<'_> {
    /// Replace the active selection mask wholesale.
    pub fn copy_to_current_mask(&mut self, mask: &Mask) {
        let old = self.sprite().mask().clone();
        self.push(Record::SetMask { mask: old });
        self.sprite_mut().replace_mask(mask.clone());
    }

    /// Reposition the active selection mask.
    pub fn set_mask_position(&mut self, x: i32, y: i32) {
        let (old_x, old_y) = (self.sprite().mask().x(), self.sprite().mask().y());
        self.push(Record::SetMaskPosition { x: old_x, y: old_y });
        self.sprite_mut().set_mask_origin(x, y);
    }

    /// Clear the active selection, stashing a snapshot of it in the
    /// [`DESELECTED_MASK`] repository slot (replacing any prior snapshot
    /// there; the repository itself is not journaled).
    pub fn deselect_mask(&mut self) {
        let snapshot = self.sprite().mask().clone();
        self.sprite_mut().stash_mask(DESELECTED_MASK, snapshot);

        let old = self.sprite().mask().clone();
        self.push(Record::SetMask { mask: old });
        self.sprite_mut().replace_mask(Mask::empty());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/mask_ops.rs"]
mod tests;
