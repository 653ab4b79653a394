use crate::foundation::error::{CadreError, CadreResult};
use crate::foundation::geom::IRect;
use crate::raster::color::{self, ColorMode, DitherMethod};
use crate::raster::palette::Palette;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Blend mode used when merging one surface onto another.
pub enum BlendMode {
    /// Standard "source over destination" with straight alpha.
    #[default]
    Normal,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A mode-aware rectangular pixel buffer.
///
/// This is the pixel-surface capability consumed by the document model and
/// the composite operations: allocate, clear, copy, crop, merge, flip,
/// per-pixel access, mode conversion and content-bounds shrinking. Pixels are
/// packed `u32` values interpreted per [`ColorMode`] (see
/// [`crate::raster::color`]).
pub struct Surface {
    mode: ColorMode,
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Surface {
    /// Allocate a zero-filled surface.
    ///
    /// Allocation is the only recoverable failure in this crate: zero or
    /// overflowing dimensions are reported as [`CadreError::Allocation`].
    pub fn new(mode: ColorMode, width: u32, height: u32) -> CadreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CadreError::allocation(format!(
                "surface dimensions must be positive (got {width}x{height})"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CadreError::allocation("surface dimensions overflow"))?;
        Ok(Self {
            mode,
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Color mode of the surface.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The surface's own bounds, anchored at the origin.
    pub fn bounds(&self) -> IRect {
        IRect::new(0, 0, self.width, self.height)
    }

    /// Raw row-major pixel storage.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.bounds().contains(x, y),
            "pixel ({x}, {y}) outside {}x{} surface",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Read one pixel. The coordinate must be in bounds.
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    /// Write one pixel. The coordinate must be in bounds.
    pub fn put_pixel(&mut self, x: i32, y: i32, value: u32) {
        let i = self.index(x, y);
        self.pixels[i] = value;
    }

    pub(crate) fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.pixels[start..start + w]
    }

    /// Fill the whole surface with one pixel value.
    pub fn clear(&mut self, value: u32) {
        self.pixels.fill(value);
    }

    /// Overwrite pixels with `src` placed at `(x, y)`; the blit is clipped to
    /// this surface's bounds. Both surfaces must share a color mode.
    pub fn copy_from(&mut self, src: &Surface, x: i32, y: i32) {
        assert_eq!(self.mode, src.mode, "copy_from requires matching modes");
        let overlap = src.bounds().translated(x, y).intersect(self.bounds());
        if overlap.is_empty() {
            return;
        }
        let w = overlap.width as usize;
        for row in 0..overlap.height {
            let dy = (overlap.y + row as i32) as u32;
            let sy = (overlap.y + row as i32 - y) as u32;
            let sx = (overlap.x - x) as usize;
            let dx = overlap.x as usize;
            let src_row = &src.row(sy)[sx..sx + w];
            self.row_mut(dy)[dx..dx + w].copy_from_slice(src_row);
        }
    }

    /// New surface of size `width`×`height` holding this surface's content
    /// translated by `(-x, -y)`; uncovered area is filled with `fill`.
    pub fn crop(&self, x: i32, y: i32, width: u32, height: u32, fill: u32) -> CadreResult<Surface> {
        let mut out = Surface::new(self.mode, width, height)?;
        out.clear(fill);
        out.copy_from(self, -x, -y);
        Ok(out)
    }

    /// Copy of the given region. The region must lie fully inside the
    /// surface; this is the infallible snapshot primitive used by the journal.
    pub fn region_snapshot(&self, rect: IRect) -> Surface {
        assert!(
            !rect.is_empty() && rect.intersect(self.bounds()) == rect,
            "snapshot region {rect:?} outside {}x{} surface",
            self.width,
            self.height
        );
        let mut pixels = Vec::with_capacity(rect.width as usize * rect.height as usize);
        for row in 0..rect.height {
            let y = (rect.y + row as i32) as u32;
            let x = rect.x as usize;
            pixels.extend_from_slice(&self.row(y)[x..x + rect.width as usize]);
        }
        Surface {
            mode: self.mode,
            width: rect.width,
            height: rect.height,
            pixels,
        }
    }

    /// Merge `src` onto this surface at `(x, y)` with the given opacity and
    /// blend mode, clipped to this surface's bounds.
    pub fn merge_from(&mut self, src: &Surface, x: i32, y: i32, opacity: u8, blend: BlendMode) {
        assert_eq!(self.mode, src.mode, "merge_from requires matching modes");
        let BlendMode::Normal = blend;
        let overlap = src.bounds().translated(x, y).intersect(self.bounds());
        for dy in overlap.y..overlap.bottom() {
            for dx in overlap.x..overlap.right() {
                let s = src.pixel(dx - x, dy - y);
                let d = self.pixel(dx, dy);
                let merged = match self.mode {
                    ColorMode::Rgba => blend_normal_rgba(d, s, opacity),
                    ColorMode::Grayscale => blend_normal_graya(d, s, opacity),
                    ColorMode::Indexed => {
                        if s & 0xff != 0 {
                            s
                        } else {
                            d
                        }
                    }
                };
                self.put_pixel(dx, dy, merged);
            }
        }
    }

    /// Mirror the given region in place along the requested axes. The region
    /// must lie fully inside the surface.
    pub fn flip_region(&mut self, rect: IRect, horizontal: bool, vertical: bool) {
        let area = self.region_snapshot(rect);
        for v in 0..rect.height {
            for u in 0..rect.width {
                let dx = if horizontal {
                    rect.right() - 1 - u as i32
                } else {
                    rect.x + u as i32
                };
                let dy = if vertical {
                    rect.bottom() - 1 - v as i32
                } else {
                    rect.y + v as i32
                };
                self.put_pixel(dx, dy, area.pixel(u as i32, v as i32));
            }
        }
    }

    /// Tight bounding box of all pixels differing from `reference`, or `None`
    /// when every pixel matches it.
    pub fn content_bounds(&self, reference: u32) -> Option<IRect> {
        let (mut x1, mut y1) = (i32::MAX, i32::MAX);
        let (mut x2, mut y2) = (i32::MIN, i32::MIN);
        for y in 0..self.height {
            for (x, &px) in self.row(y).iter().enumerate() {
                if px != reference {
                    x1 = x1.min(x as i32);
                    y1 = y1.min(y as i32);
                    x2 = x2.max(x as i32);
                    y2 = y2.max(y as i32);
                }
            }
        }
        if x1 > x2 {
            return None;
        }
        Some(IRect::from_bounds(x1, y1, x2 + 1, y2 + 1))
    }

    /// Convert this surface to another color mode.
    ///
    /// `palette` drives indexed lookups in both directions; `has_background`
    /// decides whether fully transparent pixels map to the transparent index
    /// (and back). `dither` applies only to the RGBA → indexed direction.
    pub fn convert_mode(
        &self,
        target: ColorMode,
        dither: DitherMethod,
        palette: &Palette,
        has_background: bool,
    ) -> CadreResult<Surface> {
        if target == self.mode {
            return Ok(self.clone());
        }
        if target == ColorMode::Indexed && palette.is_empty() {
            return Err(CadreError::raster(
                "conversion to indexed mode requires a non-empty palette",
            ));
        }
        let mut out = Surface::new(target, self.width, self.height)?;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let px = self.pixel(x, y);
                let (r, g, b, a) = match self.mode {
                    ColorMode::Rgba => (
                        color::rgba_r(px),
                        color::rgba_g(px),
                        color::rgba_b(px),
                        color::rgba_a(px),
                    ),
                    ColorMode::Grayscale => {
                        let v = color::graya_value(px);
                        (v, v, v, color::graya_alpha(px))
                    }
                    ColorMode::Indexed => {
                        if px & 0xff == 0 && !has_background {
                            (0, 0, 0, 0)
                        } else {
                            let c = palette.color((px & 0xff) as u8);
                            (color::rgba_r(c), color::rgba_g(c), color::rgba_b(c), 255)
                        }
                    }
                };
                let converted = match target {
                    ColorMode::Rgba => color::rgba(r, g, b, a),
                    ColorMode::Grayscale => color::graya(color::luma(r, g, b), a),
                    ColorMode::Indexed => {
                        if a == 0 && !has_background {
                            0
                        } else {
                            let (r, g, b) = match dither {
                                DitherMethod::None => (r, g, b),
                                DitherMethod::Ordered => bayer_perturb(r, g, b, x, y),
                            };
                            u32::from(palette.find_nearest(r, g, b))
                        }
                    }
                };
                out.put_pixel(x, y, converted);
            }
        }
        Ok(out)
    }
}

fn blend_normal_rgba(dst: u32, src: u32, opacity: u8) -> u32 {
    let sa = u32::from(color::mul_un8(color::rgba_a(src), opacity));
    if sa == 0 {
        return dst;
    }
    let da = u32::from(color::rgba_a(dst));
    let ra = sa + da * (255 - sa) / 255;
    if ra == 0 {
        return 0;
    }
    let ch = |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * da * (255 - sa) / 255) / ra) as u8;
    color::rgba(
        ch(color::rgba_r(src), color::rgba_r(dst)),
        ch(color::rgba_g(src), color::rgba_g(dst)),
        ch(color::rgba_b(src), color::rgba_b(dst)),
        ra as u8,
    )
}

fn blend_normal_graya(dst: u32, src: u32, opacity: u8) -> u32 {
    let sa = u32::from(color::mul_un8(color::graya_alpha(src), opacity));
    if sa == 0 {
        return dst;
    }
    let da = u32::from(color::graya_alpha(dst));
    let ra = sa + da * (255 - sa) / 255;
    if ra == 0 {
        return 0;
    }
    let sv = u32::from(color::graya_value(src));
    let dv = u32::from(color::graya_value(dst));
    let rv = (sv * sa + dv * da * (255 - sa) / 255) / ra;
    color::graya(rv as u8, ra as u8)
}

// Classic 4x4 Bayer matrix, values 0..16.
const BAYER4: [[i32; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

fn bayer_perturb(r: u8, g: u8, b: u8, x: i32, y: i32) -> (u8, u8, u8) {
    let offset = BAYER4[(y & 3) as usize][(x & 3) as usize] - 7;
    let adjust = |c: u8| (i32::from(c) + offset).clamp(0, 255) as u8;
    (adjust(r), adjust(g), adjust(b))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
