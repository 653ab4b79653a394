use std::collections::BTreeMap;

use crate::document::cel::Cel;
use crate::raster::surface::BlendMode;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Stable identifier of a layer in a sprite's layer arena.
pub struct LayerId(pub(crate) u64);

impl LayerId {
    /// Construct a [`LayerId`] from a raw 64-bit value.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// The two layer variants of the document tree.
pub enum LayerKind {
    /// A pixel-bearing layer holding at most one cel per frame.
    Image {
        /// Cels keyed by frame index.
        cels: BTreeMap<u32, Cel>,
    },
    /// A grouping layer holding an ordered run of children, bottom to top.
    Folder {
        /// Child layer ids, bottom to top.
        children: Vec<LayerId>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A node of the sprite's layer tree.
///
/// Every layer except the root folder has exactly one parent folder. At most
/// one layer in a sprite carries the `background` flag, and a background
/// layer has a cel for every frame.
pub struct Layer {
    /// Display name.
    pub name: String,
    /// True for the single background layer.
    pub background: bool,
    /// False when the layer is pinned in place (background layers).
    pub moveable: bool,
    /// False hides the layer from rendering.
    pub visible: bool,
    /// False locks the layer against edits.
    pub editable: bool,
    /// Blend mode used when compositing the layer.
    pub blend: BlendMode,
    pub(crate) parent: Option<LayerId>,
    pub(crate) kind: LayerKind,
}

impl Layer {
    /// A new empty, transparent image layer.
    pub fn image(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: false,
            moveable: true,
            visible: true,
            editable: true,
            blend: BlendMode::Normal,
            parent: None,
            kind: LayerKind::Image {
                cels: BTreeMap::new(),
            },
        }
    }

    /// A new empty folder layer.
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: false,
            moveable: true,
            visible: true,
            editable: true,
            blend: BlendMode::Normal,
            parent: None,
            kind: LayerKind::Folder { children: Vec::new() },
        }
    }

    /// True for image layers.
    pub fn is_image(&self) -> bool {
        matches!(self.kind, LayerKind::Image { .. })
    }

    /// True for folder layers.
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, LayerKind::Folder { .. })
    }

    /// The parent folder, or `None` for the root.
    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// The layer's variant data.
    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// Cels keyed by frame. The layer must be an image layer.
    pub fn cels(&self) -> &BTreeMap<u32, Cel> {
        match &self.kind {
            LayerKind::Image { cels } => cels,
            LayerKind::Folder { .. } => panic!("layer '{}' is not an image layer", self.name),
        }
    }

    pub(crate) fn cels_mut(&mut self) -> &mut BTreeMap<u32, Cel> {
        match &mut self.kind {
            LayerKind::Image { cels } => cels,
            LayerKind::Folder { .. } => panic!("layer '{}' is not an image layer", self.name),
        }
    }

    /// The cel at `frame`, if any. The layer must be an image layer.
    pub fn cel(&self, frame: u32) -> Option<&Cel> {
        self.cels().get(&frame)
    }

    /// Child layer ids, bottom to top. The layer must be a folder.
    pub fn children(&self) -> &[LayerId] {
        match &self.kind {
            LayerKind::Folder { children } => children,
            LayerKind::Image { .. } => panic!("layer '{}' is not a folder", self.name),
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<LayerId> {
        match &mut self.kind {
            LayerKind::Folder { children } => children,
            LayerKind::Image { .. } => panic!("layer '{}' is not a folder", self.name),
        }
    }
}
