use crate::document::cel::Cel;
use crate::document::layer::{Layer, LayerId};
use crate::document::sprite::Sprite;
use crate::document::stock::ImageIndex;
use crate::foundation::geom::IRect;
use crate::raster::color::ColorMode;
use crate::raster::dirty::DirtySpan;
use crate::raster::mask::Mask;
use crate::raster::palette::Palette;
use crate::raster::surface::Surface;

#[derive(Clone, Debug, PartialEq)]
/// One primitive inverse operation in the journal.
///
/// Each variant captures exactly the state needed to reverse one mutation.
/// Replaying a record applies it to the sprite and yields its own inverse, so
/// undoing a group produces the matching redo group for free. Replay cannot
/// fail: every record was captured from a state it knows how to restore.
pub enum Record {
    /// Restore the sprite canvas dimensions.
    SetCanvasSize {
        /// Canvas width to restore.
        width: u32,
        /// Canvas height to restore.
        height: u32,
    },
    /// Restore the frame count, re-appending durations a shrink truncated.
    SetFrameCount {
        /// Frame count to restore.
        frames: u32,
        /// Duration tail to restore after growing back.
        duration_tail: Vec<u32>,
    },
    /// Restore the current-frame selection.
    SetCurrentFrame {
        /// Frame to select.
        frame: u32,
    },
    /// Restore the current-layer selection.
    SetCurrentLayer {
        /// Layer to select, if any.
        layer: Option<LayerId>,
    },
    /// Restore the sprite's color mode field.
    SetImageMode {
        /// Mode to restore.
        mode: ColorMode,
    },
    /// Restore one frame's duration.
    SetFrameDuration {
        /// Frame whose duration is restored.
        frame: u32,
        /// Duration in milliseconds.
        millis: u32,
    },
    /// Restore a layer's flag set.
    SetLayerFlags {
        /// Target layer.
        layer: LayerId,
        /// Background flag to restore.
        background: bool,
        /// Moveable flag to restore.
        moveable: bool,
        /// Visible flag to restore.
        visible: bool,
        /// Editable flag to restore.
        editable: bool,
    },
    /// Restore a layer's name.
    SetLayerName {
        /// Target layer.
        layer: LayerId,
        /// Name to restore.
        name: String,
    },
    /// Write a rectangular pixel snapshot back into a stock image.
    WriteImageRegion {
        /// Target stock slot.
        image: ImageIndex,
        /// Left edge of the region.
        x: i32,
        /// Top edge of the region.
        y: i32,
        /// Saved pixels for the region.
        snapshot: Surface,
    },
    /// Write sparse pixel runs back into a stock image.
    WriteImageSpans {
        /// Target stock slot.
        image: ImageIndex,
        /// Saved runs.
        spans: Vec<DirtySpan>,
    },
    /// Re-fill a vacated stock slot with its image.
    InsertImage {
        /// Slot to restore.
        index: ImageIndex,
        /// Image to restore into the slot.
        surface: Surface,
    },
    /// Vacate a stock slot.
    RemoveImage {
        /// Slot to vacate.
        index: ImageIndex,
    },
    /// Swap a stock slot's image.
    ReplaceImage {
        /// Target slot.
        index: ImageIndex,
        /// Image to restore.
        surface: Surface,
    },
    /// Re-insert a removed layer subtree at its original place.
    InsertLayer {
        /// Subtree nodes, root first, with their original ids.
        nodes: Vec<(LayerId, Layer)>,
        /// Parent folder to attach under.
        parent: LayerId,
        /// Position within the parent (0 = bottom).
        position: usize,
    },
    /// Detach and discard a layer subtree.
    RemoveLayer {
        /// Root of the subtree to remove.
        id: LayerId,
    },
    /// Restore a layer's position within its parent.
    MoveLayer {
        /// Layer to move.
        id: LayerId,
        /// Position to restore (0 = bottom).
        position: usize,
    },
    /// Re-insert a removed cel.
    InsertCel {
        /// Owning image layer.
        layer: LayerId,
        /// Frame to restore the cel at.
        frame: u32,
        /// The cel itself.
        cel: Cel,
    },
    /// Remove a cel.
    RemoveCel {
        /// Owning image layer.
        layer: LayerId,
        /// Frame holding the cel.
        frame: u32,
    },
    /// Restore a cel's position.
    SetCelPosition {
        /// Owning image layer.
        layer: LayerId,
        /// Frame holding the cel.
        frame: u32,
        /// Horizontal offset to restore.
        x: i32,
        /// Vertical offset to restore.
        y: i32,
    },
    /// Re-key a cel to another frame.
    SetCelFrame {
        /// Owning image layer.
        layer: LayerId,
        /// Frame currently holding the cel.
        frame: u32,
        /// Vacant frame to move it to.
        new_frame: u32,
    },
    /// Mirror a region of a stock image along one axis (its own inverse).
    FlipRegion {
        /// Target stock slot.
        image: ImageIndex,
        /// Region to mirror.
        rect: IRect,
        /// True mirrors horizontally, false vertically.
        horizontal: bool,
    },
    /// Restore the active selection mask wholesale.
    SetMask {
        /// Mask to restore.
        mask: Mask,
    },
    /// Restore the active mask's origin.
    SetMaskPosition {
        /// Left edge to restore.
        x: i32,
        /// Top edge to restore.
        y: i32,
    },
    /// Re-insert a removed palette.
    InsertPalette {
        /// List position to restore at.
        index: usize,
        /// The palette itself.
        palette: Palette,
    },
    /// Remove a palette.
    RemovePalette {
        /// List position to remove.
        index: usize,
    },
}

impl Record {
    /// Apply this record to the sprite and return its inverse.
    pub fn replay(self, sprite: &mut Sprite) -> Record {
        match self {
            Record::SetCanvasSize { width, height } => {
                let (old_w, old_h) = (sprite.width(), sprite.height());
                sprite.set_size(width, height);
                Record::SetCanvasSize {
                    width: old_w,
                    height: old_h,
                }
            }
            Record::SetFrameCount {
                frames,
                duration_tail,
            } => {
                let old_frames = sprite.total_frames();
                let dropped = sprite.set_total_frames(frames);
                sprite.restore_duration_tail(&duration_tail);
                Record::SetFrameCount {
                    frames: old_frames,
                    duration_tail: dropped,
                }
            }
            Record::SetCurrentFrame { frame } => {
                let old = sprite.current_frame();
                sprite.set_current_frame(frame);
                Record::SetCurrentFrame { frame: old }
            }
            Record::SetCurrentLayer { layer } => {
                let old = sprite.current_layer();
                sprite.set_current_layer(layer);
                Record::SetCurrentLayer { layer: old }
            }
            Record::SetImageMode { mode } => {
                let old = sprite.mode();
                sprite.set_mode(mode);
                Record::SetImageMode { mode: old }
            }
            Record::SetFrameDuration { frame, millis } => {
                let old = sprite.frame_duration(frame);
                sprite.set_frame_duration(frame, millis);
                Record::SetFrameDuration { frame, millis: old }
            }
            Record::SetLayerFlags {
                layer,
                background,
                moveable,
                visible,
                editable,
            } => {
                let node = sprite.layer_mut(layer);
                let inverse = Record::SetLayerFlags {
                    layer,
                    background: node.background,
                    moveable: node.moveable,
                    visible: node.visible,
                    editable: node.editable,
                };
                node.background = background;
                node.moveable = moveable;
                node.visible = visible;
                node.editable = editable;
                inverse
            }
            Record::SetLayerName { layer, name } => {
                let node = sprite.layer_mut(layer);
                let old = std::mem::replace(&mut node.name, name);
                Record::SetLayerName { layer, name: old }
            }
            Record::WriteImageRegion {
                image,
                x,
                y,
                snapshot,
            } => {
                let rect = IRect::new(x, y, snapshot.width(), snapshot.height());
                let target = sprite.stock_mut().get_mut(image);
                let old = target.region_snapshot(rect);
                target.copy_from(&snapshot, x, y);
                Record::WriteImageRegion {
                    image,
                    x,
                    y,
                    snapshot: old,
                }
            }
            Record::WriteImageSpans { image, spans } => {
                let target = sprite.stock_mut().get_mut(image);
                let mut inverse = Vec::with_capacity(spans.len());
                for span in spans {
                    let rect = IRect::new(span.x as i32, span.y as i32, span.pixels.len() as u32, 1);
                    let old = target.region_snapshot(rect);
                    for (i, &px) in span.pixels.iter().enumerate() {
                        target.put_pixel(span.x as i32 + i as i32, span.y as i32, px);
                    }
                    inverse.push(DirtySpan {
                        x: span.x,
                        y: span.y,
                        pixels: old.pixels().to_vec(),
                    });
                }
                Record::WriteImageSpans {
                    image,
                    spans: inverse,
                }
            }
            Record::InsertImage { index, surface } => {
                sprite.stock_mut().restore(index, surface);
                Record::RemoveImage { index }
            }
            Record::RemoveImage { index } => {
                let surface = sprite.stock_mut().remove(index);
                Record::InsertImage { index, surface }
            }
            Record::ReplaceImage { index, surface } => {
                let old = sprite.stock_mut().replace(index, surface);
                Record::ReplaceImage {
                    index,
                    surface: old,
                }
            }
            Record::InsertLayer {
                nodes,
                parent,
                position,
            } => {
                let id = nodes
                    .first()
                    .map(|(id, _)| *id)
                    .expect("InsertLayer record with no nodes");
                sprite.restore_subtree(nodes);
                sprite.attach_layer(id, parent, position);
                Record::RemoveLayer { id }
            }
            Record::RemoveLayer { id } => {
                let parent = sprite
                    .layer(id)
                    .parent()
                    .expect("cannot remove the root folder");
                let position = sprite.detach_layer(id);
                let nodes = sprite.remove_subtree(id);
                Record::InsertLayer {
                    nodes,
                    parent,
                    position,
                }
            }
            Record::MoveLayer { id, position } => {
                let old = sprite.move_layer(id, position);
                Record::MoveLayer { id, position: old }
            }
            Record::InsertCel { layer, frame, cel } => {
                sprite.insert_cel(layer, frame, cel);
                Record::RemoveCel { layer, frame }
            }
            Record::RemoveCel { layer, frame } => {
                let cel = sprite.remove_cel(layer, frame);
                Record::InsertCel { layer, frame, cel }
            }
            Record::SetCelPosition { layer, frame, x, y } => {
                let cel = sprite.cel_mut(layer, frame);
                let inverse = Record::SetCelPosition {
                    layer,
                    frame,
                    x: cel.x,
                    y: cel.y,
                };
                cel.x = x;
                cel.y = y;
                inverse
            }
            Record::SetCelFrame {
                layer,
                frame,
                new_frame,
            } => {
                sprite.move_cel(layer, frame, new_frame);
                Record::SetCelFrame {
                    layer,
                    frame: new_frame,
                    new_frame: frame,
                }
            }
            Record::FlipRegion {
                image,
                rect,
                horizontal,
            } => {
                sprite
                    .stock_mut()
                    .get_mut(image)
                    .flip_region(rect, horizontal, !horizontal);
                Record::FlipRegion {
                    image,
                    rect,
                    horizontal,
                }
            }
            Record::SetMask { mask } => {
                let old = sprite.replace_mask(mask);
                Record::SetMask { mask: old }
            }
            Record::SetMaskPosition { x, y } => {
                let (old_x, old_y) = (sprite.mask().x(), sprite.mask().y());
                sprite.set_mask_origin(x, y);
                Record::SetMaskPosition { x: old_x, y: old_y }
            }
            Record::InsertPalette { index, palette } => {
                sprite.insert_palette(index, palette);
                Record::RemovePalette { index }
            }
            Record::RemovePalette { index } => {
                let palette = sprite.remove_palette(index);
                Record::InsertPalette { index, palette }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journal/record.rs"]
mod tests;
