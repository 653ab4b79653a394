//! The only paths allowed to mutate the image stock. Each logs its own
//! inverse before mutating, and removal frees the image only after logging.

use crate::document::stock::ImageIndex;
use crate::journal::record::Record;
use crate::raster::surface::Surface;
use crate::transaction::guard::Transaction;

impl Transaction<'_> {
    /// Add an image to the stock, returning its slot index.
    pub fn add_image_in_stock(&mut self, surface: Surface) -> ImageIndex {
        let index = self.sprite().stock().next_index();
        self.push(Record::RemoveImage { index });
        let inserted = self.sprite_mut().stock_mut().insert(surface);
        debug_assert_eq!(inserted, index);
        index
    }

    /// Remove and destroy the image at a stock slot. The slot must not be
    /// referenced by any cel.
    pub fn remove_image_from_stock(&mut self, index: ImageIndex) {
        assert_eq!(
            self.sprite().image_users(index),
            0,
            "stock slot {} is still referenced by a cel",
            index.as_usize()
        );
        let surface = self.sprite().stock().get(index).clone();
        self.push(Record::InsertImage { index, surface });
        self.sprite_mut().stock_mut().remove(index);
    }

    /// Swap the image at a live stock slot, destroying the old image.
    pub fn replace_stock_image(&mut self, index: ImageIndex, surface: Surface) {
        let old = self.sprite().stock().get(index).clone();
        self.push(Record::ReplaceImage {
            index,
            surface: old,
        });
        self.sprite_mut().stock_mut().replace(index, surface);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/stock_ops.rs"]
mod tests;
