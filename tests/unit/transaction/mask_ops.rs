use super::*;
use crate::document::Document;
use crate::document::sprite::Sprite;
use crate::foundation::geom::IRect;
use crate::raster::color::ColorMode;

fn document() -> Document {
    Document::new(Sprite::new(ColorMode::Rgba, 4, 4).unwrap())
}

#[test]
fn copy_to_current_mask_roundtrips_under_undo() {
    let mut doc = document();
    let mask = Mask::from_rect(IRect::new(1, 1, 2, 2));
    {
        let mut tx = Transaction::new(&mut doc, "select");
        tx.copy_to_current_mask(&mask);
        tx.commit();
    }
    assert_eq!(doc.sprite().mask(), &mask);
    doc.undo();
    assert!(doc.sprite().mask().is_empty());
    doc.redo();
    assert_eq!(doc.sprite().mask(), &mask);
}

#[test]
fn set_mask_position_moves_only_the_origin() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "select");
        tx.copy_to_current_mask(&Mask::from_rect(IRect::new(0, 0, 2, 2)));
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "nudge");
        tx.set_mask_position(3, -1);
        tx.commit();
    }
    assert_eq!(doc.sprite().mask().bounds(), IRect::new(3, -1, 2, 2));
    doc.undo();
    assert_eq!(doc.sprite().mask().bounds(), IRect::new(0, 0, 2, 2));
}

#[test]
fn deselect_stashes_a_snapshot_and_clears() {
    let mut doc = document();
    let mask = Mask::from_rect(IRect::new(1, 0, 2, 3));
    {
        let mut tx = Transaction::new(&mut doc, "select");
        tx.copy_to_current_mask(&mask);
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "deselect");
        tx.deselect_mask();
        tx.commit();
    }
    assert!(doc.sprite().mask().is_empty());
    assert_eq!(doc.sprite().stashed_mask(DESELECTED_MASK), Some(&mask));

    // Undo restores the active mask; the stashed snapshot is not journaled.
    doc.undo();
    assert_eq!(doc.sprite().mask(), &mask);
    assert_eq!(doc.sprite().stashed_mask(DESELECTED_MASK), Some(&mask));
}

#[test]
fn deselect_replaces_an_older_snapshot() {
    let mut doc = document();
    let first = Mask::from_rect(IRect::new(0, 0, 1, 1));
    let second = Mask::from_rect(IRect::new(2, 2, 2, 2));
    for mask in [&first, &second] {
        let mut tx = Transaction::new(&mut doc, "select and deselect");
        tx.copy_to_current_mask(mask);
        tx.deselect_mask();
        tx.commit();
    }
    assert_eq!(doc.sprite().stashed_mask(DESELECTED_MASK), Some(&second));
}
