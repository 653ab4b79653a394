//! Whole-sprite operations: canvas size, cropping, color-mode conversion and
//! the selection setters.

use crate::document::layer::LayerId;
use crate::foundation::error::CadreResult;
use crate::foundation::geom::IRect;
use crate::journal::record::Record;
use crate::raster::color::{ColorMode, DitherMethod};
use crate::raster::palette::Palette;
use crate::raster::surface::Surface;
use crate::transaction::guard::Transaction;

impl Transaction<'_> {
    /// Change the sprite canvas dimensions. Both must be positive.
    pub fn set_sprite_size(&mut self, width: u32, height: u32) {
        assert!(width > 0 && height > 0, "sprite dimensions must be positive");
        let (old_width, old_height) = (self.sprite().width(), self.sprite().height());
        self.push(Record::SetCanvasSize {
            width: old_width,
            height: old_height,
        });
        self.sprite_mut().set_size(width, height);
    }

    /// Change the total frame count. Must be at least one.
    pub fn set_frame_count(&mut self, frames: u32) {
        assert!(frames >= 1, "a sprite must keep at least one frame");
        let old = self.sprite().total_frames();
        let duration_tail = if frames < old {
            self.sprite().durations()[frames as usize..].to_vec()
        } else {
            Vec::new()
        };
        self.push(Record::SetFrameCount {
            frames: old,
            duration_tail,
        });
        self.sprite_mut().set_total_frames(frames);
    }

    /// Select a frame.
    pub fn set_current_frame(&mut self, frame: u32) {
        let old = self.sprite().current_frame();
        self.push(Record::SetCurrentFrame { frame: old });
        self.sprite_mut().set_current_frame(frame);
    }

    /// Select a layer (or clear the selection).
    pub fn set_current_layer(&mut self, layer: Option<LayerId>) {
        let old = self.sprite().current_layer();
        self.push(Record::SetCurrentLayer { layer: old });
        self.sprite_mut().set_current_layer(layer);
    }

    /// Crop the sprite to the `width`×`height` window at `(x, y)`.
    ///
    /// Resizes the canvas, translates every layer's cels by `(-x, -y)`
    /// through the whole tree, crops the background layer's pixels to the new
    /// canvas (uncovered area filled with `background`), and repositions a
    /// non-empty mask by the same offset. The resize happens first: the crop
    /// of the background assumes the new coordinate space, while cel
    /// translation is a size-independent offset.
    pub fn crop_sprite(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        background: u32,
    ) -> CadreResult<()> {
        self.set_sprite_size(width, height);
        self.displace_layers(self.sprite().root(), -x, -y);
        if let Some(layer) = self.sprite().background_layer() {
            self.crop_layer(layer, 0, 0, width, height, background)?;
        }
        if !self.sprite().mask().is_empty() {
            let (mask_x, mask_y) = (self.sprite().mask().x(), self.sprite().mask().y());
            self.set_mask_position(mask_x - x, mask_y - y);
        }
        Ok(())
    }

    /// Crop the sprite to the union, over every frame, of the tight bounding
    /// box of pixels differing from the rendered frame's top-left pixel.
    ///
    /// When no frame has any differing pixel this performs no mutation and
    /// logs nothing.
    #[tracing::instrument(skip(self))]
    pub fn autocrop_sprite(&mut self, background: u32) -> CadreResult<()> {
        let mut bounds = IRect::default();
        {
            let sprite = self.sprite();
            let mut scratch = Surface::new(sprite.mode(), sprite.width(), sprite.height())?;
            for frame in 0..sprite.total_frames() {
                scratch.clear(0);
                sprite.render_frame(&mut scratch, 0, 0, frame);
                if let Some(frame_bounds) = scratch.content_bounds(scratch.pixel(0, 0)) {
                    bounds = bounds.union(frame_bounds);
                }
            }
        }
        if bounds.is_empty() {
            return Ok(());
        }
        self.crop_sprite(bounds.x, bounds.y, bounds.width, bounds.height, background)
    }

    /// Convert the sprite and every stock image to another color mode.
    ///
    /// A no-op when the sprite is already in `mode`. Every stock slot is
    /// converted and replaced in place (each replacement journaled on its
    /// own), then the sprite's mode field changes and the cached overlay is
    /// invalidated. Converting to grayscale additionally removes every
    /// palette and installs the generated grayscale ramp; other target modes
    /// leave palettes untouched.
    #[tracing::instrument(skip(self))]
    pub fn set_image_mode(&mut self, mode: ColorMode, dither: DitherMethod) -> CadreResult<()> {
        if self.sprite().mode() == mode {
            return Ok(());
        }

        let palette = self
            .sprite()
            .palettes()
            .first()
            .cloned()
            .unwrap_or_else(Palette::grayscale);
        let has_background = self.sprite().background_layer().is_some();

        for index in self.sprite().stock().live_indices() {
            let converted = self.sprite().stock().get(index).convert_mode(
                mode,
                dither,
                &palette,
                has_background,
            )?;
            self.replace_stock_image(index, converted);
        }

        let old_mode = self.sprite().mode();
        self.push(Record::SetImageMode { mode: old_mode });
        self.sprite_mut().set_mode(mode);
        self.invalidate_overlay();

        if mode == ColorMode::Grayscale {
            for index in (0..self.sprite().palettes().len()).rev() {
                let palette = self.sprite().palettes()[index].clone();
                self.push(Record::InsertPalette { index, palette });
                self.sprite_mut().remove_palette(index);
            }
            self.push(Record::RemovePalette { index: 0 });
            self.sprite_mut().insert_palette(0, Palette::grayscale());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/sprite_ops.rs"]
mod tests;
