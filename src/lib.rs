//! Cadre is a transactional editing core for animated multi-layer sprite documents.
//!
//! A sprite is a mutable tree-structured document: frames × layers × a shared
//! pool of pixel images (the stock). Cadre lets arbitrarily complex multi-step
//! edits (crop, flatten, frame insertion/removal, masked clears, pastes, …) be
//! applied as a single logical, all-or-nothing user action, with exact inverse
//! replay for undo and forward replay for redo.
//!
//! # Architecture
//!
//! 1. **Document model**: [`Sprite`], [`Layer`], [`Cel`], [`Stock`], [`Mask`],
//!    [`Palette`]: pure data plus structural edit primitives, no undo awareness.
//! 2. **Journal**: [`UndoHistory`], an ordered log of inverse-operation
//!    [`Record`]s grouped into labeled, atomically-replayed groups.
//! 3. **Scope guard**: [`Transaction`], which correlates one user-visible
//!    action with exactly one journal group and commits or rolls back on
//!    scope exit.
//! 4. **Composite operations**: the editing library (methods on
//!    [`Transaction`]), each a deterministic sequence of journal-observed
//!    primitive mutations.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Log before mutate**: every primitive records its inverse before the
//!   forward mutation is applied, so a half-applied composite operation can
//!   always be rolled back by its enclosing transaction.
//! - **Single-threaded**: every operation runs to completion on the caller's
//!   thread; the document is exclusively owned for the span of a transaction.
//!
//! # Getting started
//!
//! ```
//! use cadre::{ColorMode, Document, Sprite, Transaction};
//!
//! let sprite = Sprite::new(ColorMode::Rgba, 32, 32).unwrap();
//! let mut doc = Document::new(sprite);
//!
//! let mut tx = Transaction::new(&mut doc, "new layer");
//! tx.new_layer();
//! tx.commit();
//! drop(tx);
//!
//! assert!(doc.undo());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod document;
mod foundation;
mod journal;
mod raster;
mod transaction;

pub use document::cel::Cel;
pub use document::layer::{Layer, LayerId, LayerKind};
pub use document::sprite::{DEFAULT_FRAME_MILLIS, Sprite};
pub use document::stock::{ImageIndex, Stock};
pub use document::Document;
pub use foundation::error::{CadreError, CadreResult};
pub use foundation::geom::IRect;
pub use journal::history::{Group, UndoHistory};
pub use journal::record::Record;
pub use raster::color::{
    ColorMode, DitherMethod, graya, graya_alpha, graya_value, luma, rgba, rgba_a, rgba_b, rgba_g,
    rgba_r,
};
pub use raster::dirty::{DirtySpan, diff_spans};
pub use raster::mask::Mask;
pub use raster::palette::Palette;
pub use raster::surface::{BlendMode, Surface};
pub use transaction::guard::Transaction;
pub use transaction::mask_ops::DESELECTED_MASK;
