use crate::foundation::geom::IRect;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A rectangular-bounded selection bitmap.
///
/// The mask stores one membership bit per pixel of its local `width`×`height`
/// box, positioned at `(x, y)` in sprite space. A zero-area box is the
/// distinguished "no selection" state.
pub struct Mask {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// The empty (no selection) mask.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fully-selected rectangular mask covering `rect`.
    pub fn from_rect(rect: IRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            bits: vec![true; rect.width as usize * rect.height as usize],
        }
    }

    /// True when no pixels are selected.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bounding box in sprite space.
    pub fn bounds(&self) -> IRect {
        IRect::new(self.x, self.y, self.width, self.height)
    }

    /// Left edge in sprite space.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top edge in sprite space.
    pub fn y(&self) -> i32 {
        self.y
    }

    pub(crate) fn set_origin(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Membership bit at local coordinates `(u, v)`; false outside the box.
    pub fn bit(&self, u: u32, v: u32) -> bool {
        if u >= self.width || v >= self.height {
            return false;
        }
        self.bits[v as usize * self.width as usize + u as usize]
    }

    /// Set the membership bit at local coordinates `(u, v)`. The coordinate
    /// must lie inside the box.
    pub fn set_bit(&mut self, u: u32, v: u32, on: bool) {
        assert!(
            u < self.width && v < self.height,
            "mask bit ({u}, {v}) outside {}x{} box",
            self.width,
            self.height
        );
        self.bits[v as usize * self.width as usize + u as usize] = on;
    }

    /// Membership test in sprite space.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if !self.bounds().contains(x, y) {
            return false;
        }
        self.bit((x - self.x) as u32, (y - self.y) as u32)
    }
}
