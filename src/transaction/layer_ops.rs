//! Layer lifecycle and restructuring: creation, removal with selection
//! handoff, reordering, background conversion both ways, flattening, and the
//! recursive crop/displace helpers used by sprite cropping.

use crate::document::cel::Cel;
use crate::document::layer::{Layer, LayerId};
use crate::foundation::error::CadreResult;
use crate::foundation::geom::IRect;
use crate::journal::record::Record;
use crate::raster::dirty::diff_spans;
use crate::raster::surface::Surface;
use crate::transaction::guard::Transaction;

impl Transaction<'_> {
    /// Create an empty transparent image layer in the currently selected
    /// folder, select it, and return its id.
    pub fn new_layer(&mut self) -> LayerId {
        let name = format!("Layer {}", self.sprite().layer_count());
        let parent = self.selected_folder();
        let id = self.sprite_mut().alloc_layer(Layer::image(name));
        self.push(Record::RemoveLayer { id });
        let top = self.sprite().layer(parent).children().len();
        self.sprite_mut().attach_layer(id, parent, top);
        self.set_current_layer(Some(id));
        id
    }

    /// The folder new layers land in: the current layer when it is a folder,
    /// else its parent, else the root.
    fn selected_folder(&self) -> LayerId {
        match self.sprite().current_layer() {
            Some(id) if self.sprite().layer(id).is_folder() => id,
            Some(id) => self
                .sprite()
                .layer(id)
                .parent()
                .unwrap_or_else(|| self.sprite().root()),
            None => self.sprite().root(),
        }
    }

    /// Remove and destroy a layer (and, for folders, its whole subtree).
    ///
    /// When the removed layer is selected, selection moves to its previous
    /// sibling, else its next sibling, else its parent folder (unless the
    /// parent is the tree root, which clears the selection).
    pub fn remove_layer(&mut self, id: LayerId) {
        assert_ne!(
            id,
            self.sprite().root(),
            "the root folder cannot be removed"
        );
        let parent = self
            .sprite()
            .layer(id)
            .parent()
            .unwrap_or_else(|| panic!("layer id {} is detached", id.as_u64()));
        let position = self.sprite().layer_position(id);

        if self.sprite().current_layer() == Some(id) {
            let siblings = self.sprite().layer(parent).children();
            let select = if position > 0 {
                Some(siblings[position - 1])
            } else if position + 1 < siblings.len() {
                Some(siblings[position + 1])
            } else if parent != self.sprite().root() {
                Some(parent)
            } else {
                None
            };
            self.set_current_layer(select);
        }

        let nodes = self.sprite().clone_subtree(id);
        self.push(Record::InsertLayer {
            nodes,
            parent,
            position,
        });
        self.sprite_mut().detach_layer(id);
        self.sprite_mut().remove_subtree(id);
    }

    /// Move a layer directly above `after` within the same parent folder, or
    /// to the bottom for `None`.
    pub fn move_layer_after(&mut self, id: LayerId, after: Option<LayerId>) {
        let position = self.sprite().layer_position(id);
        self.push(Record::MoveLayer { id, position });
        self.sprite_mut().move_layer_after(id, after);
    }

    /// Turn `id` into the sprite's background layer.
    ///
    /// Requires that no background layer exists yet and that `id` is a
    /// visible, editable image layer. Every existing cel is merged onto a
    /// canvas-sized buffer cleared to `background` (using the layer's blend
    /// mode and the cel's opacity) and written back, in place for
    /// canvas-sized images and by stock-slot replacement otherwise, with the
    /// cel repositioned to the origin. Frames lacking a cel get a freshly
    /// stocked `background`-filled image and a new cel. Finally the layer is
    /// flagged, renamed and moved to the bottom of its folder.
    #[tracing::instrument(skip(self))]
    pub fn background_from_layer(&mut self, id: LayerId, background: u32) -> CadreResult<()> {
        {
            let layer = self.sprite().layer(id);
            assert!(layer.is_image(), "background_from_layer requires an image layer");
            assert!(
                layer.visible && layer.editable,
                "background_from_layer requires a visible, editable layer"
            );
        }
        assert!(
            self.sprite().background_layer().is_none(),
            "sprite already has a background layer"
        );

        let (mode, width, height) = {
            let sprite = self.sprite();
            (sprite.mode(), sprite.width(), sprite.height())
        };
        let mut scratch = Surface::new(mode, width, height)?;
        let blend = self.sprite().layer(id).blend;

        let cels: Vec<(u32, Cel)> = self
            .sprite()
            .layer(id)
            .cels()
            .iter()
            .map(|(&frame, &cel)| (frame, cel))
            .collect();
        for (frame, cel) in cels {
            {
                let image = self.sprite().stock().get(cel.image);
                scratch.clear(background);
                scratch.merge_from(image, cel.x, cel.y, cel.opacity, blend);
            }
            self.set_cel_position(id, frame, 0, 0);

            let (image_width, image_height) = {
                let image = self.sprite().stock().get(cel.image);
                (image.width(), image.height())
            };
            if (image_width, image_height) == (width, height) {
                let snapshot = self
                    .sprite()
                    .stock()
                    .get(cel.image)
                    .region_snapshot(IRect::new(0, 0, width, height));
                self.push(Record::WriteImageRegion {
                    image: cel.image,
                    x: 0,
                    y: 0,
                    snapshot,
                });
                self.sprite_mut()
                    .stock_mut()
                    .get_mut(cel.image)
                    .copy_from(&scratch, 0, 0);
            } else {
                self.replace_stock_image(cel.image, scratch.clone());
            }
        }

        // Fill all empty frames with a flat background-colored cel.
        for frame in 0..self.sprite().total_frames() {
            if self.sprite().layer(id).cel(frame).is_none() {
                let mut image = Surface::new(mode, width, height)?;
                image.clear(background);
                let index = self.add_image_in_stock(image);
                self.add_cel(id, frame, Cel::new(index));
            }
        }

        self.configure_layer_as_background(id);
        Ok(())
    }

    /// Turn the current (background) layer back into an ordinary layer:
    /// clears the background/pinned flags and resets the name.
    pub fn layer_from_background(&mut self) {
        let id = self
            .sprite()
            .current_layer()
            .expect("layer_from_background requires a current layer");
        {
            let layer = self.sprite().layer(id);
            assert!(
                layer.background && layer.is_image(),
                "current layer is not the background"
            );
            assert!(
                layer.visible && layer.editable,
                "layer_from_background requires a visible, editable layer"
            );
        }

        let (background, moveable, visible, editable, name) = {
            let layer = self.sprite().layer(id);
            (
                layer.background,
                layer.moveable,
                layer.visible,
                layer.editable,
                layer.name.clone(),
            )
        };
        self.push(Record::SetLayerFlags {
            layer: id,
            background,
            moveable,
            visible,
            editable,
        });
        self.push(Record::SetLayerName { layer: id, name });

        let node = self.sprite_mut().layer_mut(id);
        node.background = false;
        node.moveable = true;
        node.name = "Layer 0".to_string();
    }

    /// Flatten every layer into the background.
    ///
    /// Ensures a background layer exists (creating one at the bottom of the
    /// root folder if absent), renders the full visible composite of every
    /// frame into it (capturing a sparse dirty-run snapshot where a cel
    /// already exists, stocking a fresh image and cel where it does not),
    /// then selects the background and removes every other top-level layer.
    ///
    /// The operation is not atomic at the primitive level; rollback of the
    /// enclosing transaction restores full consistency because every step is
    /// journaled before it mutates.
    #[tracing::instrument(skip(self))]
    pub fn flatten_layers(&mut self, background_color: u32) -> CadreResult<()> {
        let (mode, width, height) = {
            let sprite = self.sprite();
            (sprite.mode(), sprite.width(), sprite.height())
        };
        let mut scratch = Surface::new(mode, width, height)?;

        let background = match self.sprite().background_layer() {
            Some(id) => id,
            None => {
                let id = self.sprite_mut().alloc_layer(Layer::image("Background"));
                self.push(Record::RemoveLayer { id });
                let root = self.sprite().root();
                let top = self.sprite().layer(root).children().len();
                self.sprite_mut().attach_layer(id, root, top);

                let position = self.sprite().layer_position(id);
                self.push(Record::MoveLayer { id, position });
                let node = self.sprite_mut().layer_mut(id);
                node.background = true;
                node.moveable = false;
                node.name = "Background".to_string();
                self.sprite_mut().move_layer(id, 0);
                id
            }
        };

        for frame in 0..self.sprite().total_frames() {
            scratch.clear(background_color);
            self.sprite().render_frame(&mut scratch, 0, 0, frame);

            match self.sprite().layer(background).cel(frame).copied() {
                Some(cel) => {
                    let spans = diff_spans(self.sprite().stock().get(cel.image), &scratch);
                    if !spans.is_empty() {
                        self.push(Record::WriteImageSpans {
                            image: cel.image,
                            spans,
                        });
                        self.sprite_mut()
                            .stock_mut()
                            .get_mut(cel.image)
                            .copy_from(&scratch, 0, 0);
                    }
                }
                None => {
                    let index = self.add_image_in_stock(scratch.clone());
                    self.add_cel(background, frame, Cel::new(index));
                }
            }
        }

        if self.sprite().current_layer() != Some(background) {
            self.set_current_layer(Some(background));
        }

        let top_level: Vec<LayerId> = self
            .sprite()
            .layer(self.sprite().root())
            .children()
            .to_vec();
        for layer in top_level {
            if layer != background {
                self.remove_layer(layer);
            }
        }
        Ok(())
    }

    /// Flag, rename and sink a layer into the background position, each step
    /// journaled.
    pub(crate) fn configure_layer_as_background(&mut self, id: LayerId) {
        let (background, moveable, visible, editable, name) = {
            let layer = self.sprite().layer(id);
            (
                layer.background,
                layer.moveable,
                layer.visible,
                layer.editable,
                layer.name.clone(),
            )
        };
        self.push(Record::SetLayerFlags {
            layer: id,
            background,
            moveable,
            visible,
            editable,
        });
        self.push(Record::SetLayerName { layer: id, name });
        let position = self.sprite().layer_position(id);
        self.push(Record::MoveLayer { id, position });

        let node = self.sprite_mut().layer_mut(id);
        node.background = true;
        node.moveable = false;
        node.name = "Background".to_string();
        self.sprite_mut().move_layer(id, 0);
    }

    /// Crop every cel of an image layer to the given window; folders are
    /// ignored. Non-background layers fill uncovered area with transparency
    /// instead of `background`.
    pub(crate) fn crop_layer(
        &mut self,
        id: LayerId,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        background: u32,
    ) -> CadreResult<()> {
        if !self.sprite().layer(id).is_image() {
            return Ok(());
        }
        let background = if self.sprite().layer(id).background {
            background
        } else {
            0
        };
        let frames: Vec<u32> = self.sprite().layer(id).cels().keys().copied().collect();
        for frame in frames {
            self.crop_cel(id, frame, x, y, width, height, background)?;
        }
        Ok(())
    }

    /// Displace every cel of `id` and its whole subtree by `(dx, dy)`.
    pub(crate) fn displace_layers(&mut self, id: LayerId, dx: i32, dy: i32) {
        for node in self.sprite().subtree(id) {
            if !self.sprite().layer(node).is_image() {
                continue;
            }
            let cels: Vec<(u32, Cel)> = self
                .sprite()
                .layer(node)
                .cels()
                .iter()
                .map(|(&frame, &cel)| (frame, cel))
                .collect();
            for (frame, cel) in cels {
                self.set_cel_position(node, frame, cel.x + dx, cel.y + dy);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/layer_ops.rs"]
mod tests;
