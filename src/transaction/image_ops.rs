//! Pixel-level edits on the current cel: masked clears, flips and pastes.

use crate::document::stock::ImageIndex;
use crate::foundation::geom::IRect;
use crate::journal::record::Record;
use crate::raster::surface::{BlendMode, Surface};
use crate::transaction::guard::Transaction;

impl Transaction<'_> {
    /// Clear the masked region of the current cel with `background`.
    ///
    /// With no current cel this is a no-op. With an empty mask, the whole
    /// image is cleared when the current layer is the background, and the cel
    /// is removed outright when the layer is transparent. With a non-empty
    /// mask, only pixels whose mask bit is set inside the mask/image
    /// intersection are overwritten (a no-op when the intersection is empty).
    #[tracing::instrument(skip(self))]
    pub fn clear_mask(&mut self, background: u32) {
        let Some((layer, frame, cel)) = self.current_cel() else {
            return;
        };

        if self.sprite().mask().is_empty() {
            if self.sprite().layer(layer).background {
                let snapshot = {
                    let image = self.sprite().stock().get(cel.image);
                    image.region_snapshot(image.bounds())
                };
                self.push(Record::WriteImageRegion {
                    image: cel.image,
                    x: 0,
                    y: 0,
                    snapshot,
                });
                self.sprite_mut()
                    .stock_mut()
                    .get_mut(cel.image)
                    .clear(background);
            } else {
                self.remove_cel(layer, frame);
            }
            return;
        }

        let mask = self.sprite().mask().clone();
        let offset_x = mask.x() - cel.x;
        let offset_y = mask.y() - cel.y;
        let local = IRect::new(
            offset_x,
            offset_y,
            mask.bounds().width,
            mask.bounds().height,
        )
        .intersect(self.sprite().stock().get(cel.image).bounds());
        if local.is_empty() {
            return;
        }

        let snapshot = self.sprite().stock().get(cel.image).region_snapshot(local);
        self.push(Record::WriteImageRegion {
            image: cel.image,
            x: local.x,
            y: local.y,
            snapshot,
        });

        let image = self.sprite_mut().stock_mut().get_mut(cel.image);
        for v in 0..mask.bounds().height {
            for u in 0..mask.bounds().width {
                if !mask.bit(u, v) {
                    continue;
                }
                let x = u as i32 + offset_x;
                let y = v as i32 + offset_y;
                if local.contains(x, y) {
                    image.put_pixel(x, y, background);
                }
            }
        }
    }

    /// Mirror a rectangle of a stock image along the requested axes. Each
    /// axis is journaled as its own flip record (a flip is its own inverse).
    pub fn flip_image(
        &mut self,
        image: ImageIndex,
        rect: IRect,
        horizontal: bool,
        vertical: bool,
    ) {
        if horizontal {
            self.push(Record::FlipRegion {
                image,
                rect,
                horizontal: true,
            });
        }
        if vertical {
            self.push(Record::FlipRegion {
                image,
                rect,
                horizontal: false,
            });
        }
        self.sprite_mut()
            .stock_mut()
            .get_mut(image)
            .flip_region(rect, horizontal, vertical);
    }

    /// Merge `src` onto the current cel's image at `(x, y)` in sprite space
    /// with the given opacity and normal blending.
    ///
    /// Requires an editable current image layer with a cel at the current
    /// frame. The stock slot is always replaced wholesale rather than patched
    /// in place, so cels sharing the slot can never observe a partial edit.
    pub fn paste_image(&mut self, src: &Surface, x: i32, y: i32, opacity: u8) {
        let id = self
            .sprite()
            .current_layer()
            .expect("paste_image requires a current layer");
        {
            let layer = self.sprite().layer(id);
            assert!(
                layer.is_image() && layer.visible && layer.editable,
                "paste_image requires a visible, editable image layer"
            );
        }
        let frame = self.sprite().current_frame();
        let cel = *self
            .sprite()
            .layer(id)
            .cel(frame)
            .expect("paste_image requires a cel at the current frame");

        let mut merged = self.sprite().stock().get(cel.image).clone();
        merged.merge_from(src, x - cel.x, y - cel.y, opacity, BlendMode::Normal);
        self.replace_stock_image(cel.image, merged);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/image_ops.rs"]
mod tests;
