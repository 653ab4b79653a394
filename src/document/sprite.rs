use std::collections::HashMap;

use crate::document::cel::Cel;
use crate::document::layer::{Layer, LayerId, LayerKind};
use crate::document::stock::{ImageIndex, Stock};
use crate::foundation::error::{CadreError, CadreResult};
use crate::raster::color::ColorMode;
use crate::raster::mask::Mask;
use crate::raster::palette::Palette;
use crate::raster::surface::Surface;

/// Default duration of a freshly created frame, in milliseconds.
pub const DEFAULT_FRAME_MILLIS: u32 = 100;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// An animated multi-layer sprite document.
///
/// A sprite owns an ordered layer tree rooted at a folder, a [`Stock`] of
/// shared pixel images, per-frame durations, the active selection [`Mask`]
/// (plus a small named repository of stashed masks), a palette list and the
/// current frame/layer selection.
///
/// The sprite is pure data plus structural edit primitives; it has no undo
/// awareness. All editing goes through [`crate::Transaction`], which journals
/// an inverse record before every structural mutation it performs here.
pub struct Sprite {
    width: u32,
    height: u32,
    mode: ColorMode,
    total_frames: u32,
    current_frame: u32,
    durations: Vec<u32>,
    layers: HashMap<LayerId, Layer>,
    next_layer_id: u64,
    root: LayerId,
    current_layer: Option<LayerId>,
    stock: Stock,
    mask: Mask,
    stashed_masks: HashMap<String, Mask>,
    palettes: Vec<Palette>,
}

/// Observable-state equality: everything a caller can see through the public
/// API. The private id allocator and the unjournaled mask repository are
/// deliberately excluded, so a rolled-back transaction compares equal to the
/// state it started from.
impl PartialEq for Sprite {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.mode == other.mode
            && self.total_frames == other.total_frames
            && self.current_frame == other.current_frame
            && self.durations == other.durations
            && self.layers == other.layers
            && self.root == other.root
            && self.current_layer == other.current_layer
            && self.stock == other.stock
            && self.mask == other.mask
            && self.palettes == other.palettes
    }
}

impl Sprite {
    /// Create a one-frame sprite with an empty root folder, an empty stock
    /// and the built-in grayscale palette.
    pub fn new(mode: ColorMode, width: u32, height: u32) -> CadreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CadreError::validation(format!(
                "sprite canvas must be positive (got {width}x{height})"
            )));
        }
        let root = LayerId(0);
        let mut layers = HashMap::new();
        layers.insert(root, Layer::folder("Root"));
        Ok(Self {
            width,
            height,
            mode,
            total_frames: 1,
            current_frame: 0,
            durations: vec![DEFAULT_FRAME_MILLIS],
            layers,
            next_layer_id: 1,
            root,
            current_layer: None,
            stock: Stock::new(),
            mask: Mask::empty(),
            stashed_masks: HashMap::new(),
            palettes: vec![Palette::grayscale()],
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color mode shared by all stock images.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Total number of frames; always at least one.
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Currently selected frame, in `0..total_frames`.
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Per-frame durations in milliseconds; length equals `total_frames`.
    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_duration(&self, frame: u32) -> u32 {
        self.durations[frame as usize]
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        assert!(width > 0 && height > 0, "sprite canvas must be positive");
        self.width = width;
        self.height = height;
    }

    pub(crate) fn set_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    /// Resize the frame count, truncating or padding durations to match.
    /// Returns the truncated duration tail (empty when growing).
    pub(crate) fn set_total_frames(&mut self, frames: u32) -> Vec<u32> {
        assert!(frames >= 1, "a sprite must keep at least one frame");
        let dropped = if (frames as usize) < self.durations.len() {
            self.durations.split_off(frames as usize)
        } else {
            let pad = *self.durations.last().unwrap_or(&DEFAULT_FRAME_MILLIS);
            self.durations.resize(frames as usize, pad);
            Vec::new()
        };
        self.total_frames = frames;
        dropped
    }

    /// Overwrite the last `tail.len()` durations; used by journal replay to
    /// restore values a frame-count shrink truncated.
    pub(crate) fn restore_duration_tail(&mut self, tail: &[u32]) {
        if tail.is_empty() {
            return;
        }
        let n = self.durations.len();
        assert!(tail.len() <= n, "duration tail longer than frame count");
        self.durations[n - tail.len()..].copy_from_slice(tail);
    }

    pub(crate) fn set_current_frame(&mut self, frame: u32) {
        assert!(frame < self.total_frames, "current frame out of range");
        self.current_frame = frame;
    }

    pub(crate) fn set_frame_duration(&mut self, frame: u32, millis: u32) {
        self.durations[frame as usize] = millis;
    }

    pub(crate) fn set_all_durations(&mut self, millis: u32) {
        self.durations.fill(millis);
    }

    /// Id of the root folder.
    pub fn root(&self) -> LayerId {
        self.root
    }

    /// The layer for a live id.
    pub fn layer(&self, id: LayerId) -> &Layer {
        self.try_layer(id)
            .unwrap_or_else(|| panic!("layer id {} is not in this sprite", id.0))
    }

    /// The layer for an id, or `None` for unknown ids.
    pub fn try_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        self.layers
            .get_mut(&id)
            .unwrap_or_else(|| panic!("layer id {} is not in this sprite", id.0))
    }

    /// Number of layers excluding the root folder.
    pub fn layer_count(&self) -> usize {
        self.layers.len() - 1
    }

    /// Currently selected layer, if any.
    pub fn current_layer(&self) -> Option<LayerId> {
        self.current_layer
    }

    pub(crate) fn set_current_layer(&mut self, layer: Option<LayerId>) {
        if let Some(id) = layer {
            assert!(self.layers.contains_key(&id), "selecting unknown layer");
        }
        self.current_layer = layer;
    }

    /// The single background layer, if one exists.
    pub fn background_layer(&self) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|(_, layer)| layer.background)
            .map(|(&id, _)| id)
    }

    /// Ids of `id` and every layer below it, as a worklist (parents before
    /// their children).
    pub fn subtree(&self, id: LayerId) -> Vec<LayerId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            if let LayerKind::Folder { children } = &self.layer(out[i]).kind {
                out.extend(children.iter().copied());
            }
            i += 1;
        }
        out
    }

    /// Insert a detached layer into the arena and return its fresh id.
    pub(crate) fn alloc_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.insert(id, layer);
        id
    }

    /// Clones of `id`'s subtree nodes, for journaling ahead of removal. The
    /// root clone's parent link is cleared so the nodes re-insert cleanly.
    pub(crate) fn clone_subtree(&self, id: LayerId) -> Vec<(LayerId, Layer)> {
        let mut nodes: Vec<(LayerId, Layer)> = self
            .subtree(id)
            .into_iter()
            .map(|id| (id, self.layer(id).clone()))
            .collect();
        nodes[0].1.parent = None;
        nodes
    }

    /// Remove a detached layer and all its descendants from the arena.
    pub(crate) fn remove_subtree(&mut self, id: LayerId) -> Vec<(LayerId, Layer)> {
        assert!(
            self.layer(id).parent.is_none(),
            "remove_subtree requires a detached layer"
        );
        assert_ne!(id, self.root, "the root folder cannot be removed");
        self.subtree(id)
            .into_iter()
            .map(|id| {
                let layer = self.layers.remove(&id).unwrap_or_else(|| unreachable!());
                (id, layer)
            })
            .collect()
    }

    /// Re-insert previously removed subtree nodes under their original ids.
    pub(crate) fn restore_subtree(&mut self, nodes: Vec<(LayerId, Layer)>) {
        for (id, layer) in nodes {
            assert!(
                self.layers.insert(id, layer).is_none(),
                "layer id {} is already live",
                id.0
            );
            self.next_layer_id = self.next_layer_id.max(id.0 + 1);
        }
    }

    /// Attach a detached layer under `parent` at `position` (0 = bottom).
    pub(crate) fn attach_layer(&mut self, id: LayerId, parent: LayerId, position: usize) {
        assert!(self.layer(id).parent.is_none(), "layer is already attached");
        self.layer_mut(id).parent = Some(parent);
        self.layer_mut(parent).children_mut().insert(position, id);
    }

    /// Detach a layer from its parent folder, returning its old position.
    pub(crate) fn detach_layer(&mut self, id: LayerId) -> usize {
        let parent = self
            .layer(id)
            .parent
            .unwrap_or_else(|| panic!("layer id {} has no parent to detach from", id.0));
        let position = self.layer_position(id);
        self.layer_mut(parent).children_mut().remove(position);
        self.layer_mut(id).parent = None;
        position
    }

    /// Position of a layer within its parent folder (0 = bottom).
    pub fn layer_position(&self, id: LayerId) -> usize {
        let parent = self
            .layer(id)
            .parent
            .unwrap_or_else(|| panic!("layer id {} has no parent", id.0));
        self.layer(parent)
            .children()
            .iter()
            .position(|&c| c == id)
            .unwrap_or_else(|| unreachable!())
    }

    /// Move a layer to `position` within its parent, returning the old
    /// position.
    pub(crate) fn move_layer(&mut self, id: LayerId, position: usize) -> usize {
        let parent = self
            .layer(id)
            .parent
            .unwrap_or_else(|| panic!("layer id {} has no parent", id.0));
        let old = self.detach_layer(id);
        self.attach_layer(id, parent, position);
        old
    }

    /// Move a layer directly above `after` within the same parent (or to the
    /// bottom for `None`), returning the old position.
    pub(crate) fn move_layer_after(&mut self, id: LayerId, after: Option<LayerId>) -> usize {
        let parent = self
            .layer(id)
            .parent
            .unwrap_or_else(|| panic!("layer id {} has no parent", id.0));
        if let Some(after) = after {
            assert_eq!(
                self.layer(after).parent,
                Some(parent),
                "move_layer_after requires siblings"
            );
        }
        let old = self.detach_layer(id);
        let position = match after {
            None => 0,
            Some(after) => self.layer_position(after) + 1,
        };
        self.attach_layer(id, parent, position);
        old
    }

    /// Insert a cel at a vacant frame of an image layer.
    pub(crate) fn insert_cel(&mut self, layer: LayerId, frame: u32, cel: Cel) {
        let prev = self.layer_mut(layer).cels_mut().insert(frame, cel);
        assert!(prev.is_none(), "frame {frame} already holds a cel");
    }

    /// Remove and return the cel at a frame of an image layer.
    pub(crate) fn remove_cel(&mut self, layer: LayerId, frame: u32) -> Cel {
        self.layer_mut(layer)
            .cels_mut()
            .remove(&frame)
            .unwrap_or_else(|| panic!("frame {frame} holds no cel"))
    }

    /// Re-key a cel from `from` to the vacant frame `to`.
    pub(crate) fn move_cel(&mut self, layer: LayerId, from: u32, to: u32) {
        let cel = self.remove_cel(layer, from);
        self.insert_cel(layer, to, cel);
    }

    pub(crate) fn cel_mut(&mut self, layer: LayerId, frame: u32) -> &mut Cel {
        self.layer_mut(layer)
            .cels_mut()
            .get_mut(&frame)
            .unwrap_or_else(|| panic!("frame {frame} holds no cel"))
    }

    /// Number of cels across every layer referencing a stock slot.
    pub fn image_users(&self, index: ImageIndex) -> usize {
        self.layers
            .values()
            .filter(|layer| layer.is_image())
            .flat_map(|layer| layer.cels().values())
            .filter(|cel| cel.image == index)
            .count()
    }

    /// The shared image stock.
    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub(crate) fn stock_mut(&mut self) -> &mut Stock {
        &mut self.stock
    }

    /// The active selection mask.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Swap in a new active mask, returning the previous one.
    pub(crate) fn replace_mask(&mut self, mask: Mask) -> Mask {
        std::mem::replace(&mut self.mask, mask)
    }

    pub(crate) fn set_mask_origin(&mut self, x: i32, y: i32) {
        self.mask.set_origin(x, y);
    }

    /// A stashed mask by repository name.
    pub fn stashed_mask(&self, name: &str) -> Option<&Mask> {
        self.stashed_masks.get(name)
    }

    /// Stash a mask under a repository name, returning any replaced entry.
    pub(crate) fn stash_mask(&mut self, name: &str, mask: Mask) -> Option<Mask> {
        self.stashed_masks.insert(name.to_string(), mask)
    }

    /// The sprite's palettes.
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub(crate) fn insert_palette(&mut self, index: usize, palette: Palette) {
        self.palettes.insert(index, palette);
    }

    pub(crate) fn remove_palette(&mut self, index: usize) -> Palette {
        self.palettes.remove(index)
    }

    /// Composite every visible layer of `frame` into `into` at offset
    /// `(x, y)`, bottom to top.
    pub fn render_frame(&self, into: &mut Surface, x: i32, y: i32, frame: u32) {
        self.render_layer(self.root, into, x, y, frame);
    }

    fn render_layer(&self, id: LayerId, into: &mut Surface, x: i32, y: i32, frame: u32) {
        let layer = self.layer(id);
        if !layer.visible {
            return;
        }
        match &layer.kind {
            LayerKind::Image { cels } => {
                if let Some(cel) = cels.get(&frame) {
                    let image = self.stock.get(cel.image);
                    into.merge_from(image, x + cel.x, y + cel.y, cel.opacity, layer.blend);
                }
            }
            LayerKind::Folder { children } => {
                for &child in children {
                    self.render_layer(child, into, x, y, frame);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/sprite.rs"]
mod tests;
