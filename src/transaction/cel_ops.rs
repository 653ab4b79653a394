//! Cel lifecycle primitives: insertion, removal (with stock liveness
//! accounting), repositioning and cropping.

use crate::document::cel::Cel;
use crate::document::layer::LayerId;
use crate::foundation::error::CadreResult;
use crate::journal::record::Record;
use crate::transaction::guard::Transaction;

impl Transaction<'_> {
    /// Insert a cel at a vacant frame of an image layer. The cel must
    /// reference a live stock slot.
    pub fn add_cel(&mut self, layer: LayerId, frame: u32, cel: Cel) {
        assert!(
            self.sprite().stock().is_live(cel.image),
            "cel references vacant stock slot {}",
            cel.image.as_usize()
        );
        self.push(Record::RemoveCel { layer, frame });
        self.sprite_mut().insert_cel(layer, frame, cel);
    }

    /// Remove and destroy the cel at a frame. When no other cel references
    /// the cel's stock slot, the slot is freed as well.
    pub fn remove_cel(&mut self, layer: LayerId, frame: u32) {
        let cel = *self
            .sprite()
            .layer(layer)
            .cel(frame)
            .unwrap_or_else(|| panic!("frame {frame} holds no cel"));
        self.push(Record::InsertCel { layer, frame, cel });
        self.sprite_mut().remove_cel(layer, frame);
        if self.sprite().image_users(cel.image) == 0 {
            self.remove_image_from_stock(cel.image);
        }
    }

    /// Move a cel to another position in sprite space.
    pub fn set_cel_position(&mut self, layer: LayerId, frame: u32, x: i32, y: i32) {
        let cel = *self
            .sprite()
            .layer(layer)
            .cel(frame)
            .unwrap_or_else(|| panic!("frame {frame} holds no cel"));
        self.push(Record::SetCelPosition {
            layer,
            frame,
            x: cel.x,
            y: cel.y,
        });
        let cel = self.sprite_mut().cel_mut(layer, frame);
        cel.x = x;
        cel.y = y;
    }

    /// Re-key a cel to a vacant frame.
    pub fn set_cel_frame(&mut self, layer: LayerId, frame: u32, new_frame: u32) {
        self.push(Record::SetCelFrame {
            layer,
            frame: new_frame,
            new_frame: frame,
        });
        self.sprite_mut().move_cel(layer, frame, new_frame);
    }

    /// Crop a cel's image to the `width`×`height` window at `(x, y)` in
    /// sprite space, replacing its stock slot and repositioning the cel.
    pub(crate) fn crop_cel(
        &mut self,
        layer: LayerId,
        frame: u32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        background: u32,
    ) -> CadreResult<()> {
        let cel = *self
            .sprite()
            .layer(layer)
            .cel(frame)
            .unwrap_or_else(|| panic!("frame {frame} holds no cel"));
        let cropped = self.sprite().stock().get(cel.image).crop(
            x - cel.x,
            y - cel.y,
            width,
            height,
            background,
        )?;
        self.replace_stock_image(cel.image, cropped);
        self.set_cel_position(layer, frame, x, y);
        Ok(())
    }

    /// The current layer's cel at the current frame, when the current layer
    /// is an image layer that has one.
    pub fn current_cel(&self) -> Option<(LayerId, u32, Cel)> {
        let id = self.sprite().current_layer()?;
        if !self.sprite().layer(id).is_image() {
            return None;
        }
        let frame = self.sprite().current_frame();
        self.sprite()
            .layer(id)
            .cel(frame)
            .map(|&cel| (id, frame, cel))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/cel_ops.rs"]
mod tests;
