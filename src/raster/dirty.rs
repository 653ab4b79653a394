//! Sparse row-run diffing between two equally-sized surfaces.
//!
//! Used by operations that overwrite large images where only part of the
//! content actually changes (flattening), so the journal stores just the
//! changed runs instead of a full snapshot.

use crate::raster::surface::Surface;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One horizontal run of pixels captured for the journal.
pub struct DirtySpan {
    /// Left edge of the run.
    pub x: u32,
    /// Row of the run.
    pub y: u32,
    /// Captured pixel values, left to right.
    pub pixels: Vec<u32>,
}

/// Horizontal runs where `before` and `after` differ, carrying the `before`
/// pixel values (the pre-image a journal record needs to restore).
///
/// Both surfaces must share dimensions and color mode.
pub fn diff_spans(before: &Surface, after: &Surface) -> Vec<DirtySpan> {
    assert_eq!(before.mode(), after.mode(), "diff_spans requires matching modes");
    assert!(
        before.width() == after.width() && before.height() == after.height(),
        "diff_spans requires matching dimensions"
    );

    let mut spans = Vec::new();
    for y in 0..before.height() {
        let old = before.row(y);
        let new = after.row(y);
        let mut run_start: Option<usize> = None;
        for x in 0..=old.len() {
            let differs = x < old.len() && old[x] != new[x];
            match (run_start, differs) {
                (None, true) => run_start = Some(x),
                (Some(start), false) => {
                    spans.push(DirtySpan {
                        x: start as u32,
                        y,
                        pixels: old[start..x].to_vec(),
                    });
                    run_start = None;
                }
                _ => {}
            }
        }
    }
    spans
}
