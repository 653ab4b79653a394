use crate::raster::color::{self, rgba};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// An ordered list of packed RGBA colors used by indexed-mode surfaces.
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    /// Build a palette from packed RGBA colors.
    pub fn new(colors: Vec<u32>) -> Self {
        Self { colors }
    }

    /// The generated 256-entry grayscale ramp installed when a sprite is
    /// converted to grayscale mode.
    pub fn grayscale() -> Self {
        Self {
            colors: (0..=255).map(|v| rgba(v, v, v, 255)).collect(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Packed colors in index order.
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Color at `index`, or transparent black for out-of-range indices.
    pub fn color(&self, index: u8) -> u32 {
        self.colors.get(usize::from(index)).copied().unwrap_or(0)
    }

    /// Index of the entry closest to `(r, g, b)` by squared RGB distance.
    /// The palette must be non-empty.
    pub fn find_nearest(&self, r: u8, g: u8, b: u8) -> u8 {
        assert!(!self.colors.is_empty(), "find_nearest on empty palette");
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, &c) in self.colors.iter().enumerate().take(256) {
            let dr = i32::from(color::rgba_r(c)) - i32::from(r);
            let dg = i32::from(color::rgba_g(c)) - i32::from(g);
            let db = i32::from(color::rgba_b(c)) - i32::from(b);
            let dist = (dr * dr + dg * dg + db * db) as u32;
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best as u8
    }
}
