use crate::document::stock::ImageIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One layer's content at one frame: a positioned, translucent reference to a
/// shared image in the sprite's stock.
///
/// A cel is keyed by frame inside its owning image layer, so the frame number
/// itself lives in the layer's cel map rather than here.
pub struct Cel {
    /// Horizontal offset in sprite space.
    pub x: i32,
    /// Vertical offset in sprite space.
    pub y: i32,
    /// Opacity applied when compositing, 0–255.
    pub opacity: u8,
    /// Referenced stock slot.
    pub image: ImageIndex,
}

impl Cel {
    /// A fully opaque cel at the origin referencing `image`.
    pub fn new(image: ImageIndex) -> Self {
        Self {
            x: 0,
            y: 0,
            opacity: 255,
            image,
        }
    }
}
