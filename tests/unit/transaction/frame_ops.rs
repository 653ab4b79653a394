use super::*;
use crate::document::Document;
use crate::document::sprite::Sprite;
use crate::raster::color::ColorMode;
use crate::raster::surface::Surface;

fn document() -> Document {
    Document::new(Sprite::new(ColorMode::Rgba, 2, 2).unwrap())
}

fn stocked(tx: &mut Transaction<'_>, value: u32) -> crate::document::stock::ImageIndex {
    let mut image = Surface::new(ColorMode::Rgba, 2, 2).unwrap();
    image.clear(value);
    tx.add_image_in_stock(image)
}

fn cel_value(doc: &Document, layer: LayerId, frame: u32) -> Option<u32> {
    doc.sprite()
        .layer(layer)
        .cel(frame)
        .map(|cel| doc.sprite().stock().get(cel.image).pixel(0, 0))
}

#[test]
fn new_frame_duplicates_the_previous_cel() {
    let mut doc = document();
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        let layer = tx.new_layer();
        let index = stocked(&mut tx, 5);
        let mut cel = Cel::new(index);
        cel.x = 2;
        cel.y = 3;
        cel.opacity = 7;
        tx.add_cel(layer, 0, cel);
        tx.commit();
        layer
    };
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "new frame");
        tx.new_frame();
        tx.commit();
    }
    let sprite = doc.sprite();
    assert_eq!(sprite.total_frames(), 2);
    assert_eq!(sprite.current_frame(), 1);
    let source = sprite.layer(layer).cel(0).unwrap();
    let copy = sprite.layer(layer).cel(1).unwrap();
    assert_ne!(source.image, copy.image, "the copy gets its own stock slot");
    assert_eq!((copy.x, copy.y, copy.opacity), (2, 3, 7));
    assert_eq!(
        sprite.stock().get(copy.image).pixels(),
        sprite.stock().get(source.image).pixels()
    );

    doc.undo();
    assert_eq!(doc.sprite(), &before);
}

#[test]
fn new_frame_leaves_empty_layers_empty() {
    let mut doc = document();
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        let layer = tx.new_layer();
        tx.commit();
        layer
    };
    {
        let mut tx = Transaction::new(&mut doc, "new frame");
        tx.new_frame();
        tx.commit();
    }
    assert_eq!(doc.sprite().total_frames(), 2);
    assert!(doc.sprite().layer(layer).cels().is_empty());
}

#[test]
fn new_frame_shifts_later_cels() {
    let mut doc = document();
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(2);
        let layer = tx.new_layer();
        let a = stocked(&mut tx, 1);
        let b = stocked(&mut tx, 2);
        tx.add_cel(layer, 0, Cel::new(a));
        tx.add_cel(layer, 1, Cel::new(b));
        tx.commit();
        layer
    };
    {
        let mut tx = Transaction::new(&mut doc, "insert after frame 0");
        tx.new_frame();
        tx.commit();
    }
    assert_eq!(doc.sprite().total_frames(), 3);
    assert_eq!(cel_value(&doc, layer, 0), Some(1));
    assert_eq!(cel_value(&doc, layer, 1), Some(1), "duplicate of frame 0");
    assert_eq!(cel_value(&doc, layer, 2), Some(2), "old frame 1 shifted");
}

#[test]
fn remove_frame_renumbers_and_restores() {
    let mut doc = document();
    // 5 frames, cels at 1, 2, 3.
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(5);
        let layer = tx.new_layer();
        for (frame, value) in [(1, 10), (2, 20), (3, 30)] {
            let index = stocked(&mut tx, value);
            tx.add_cel(layer, frame, Cel::new(index));
        }
        tx.commit();
        layer
    };
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "remove frame 2");
        tx.remove_frame(2);
        tx.commit();
    }
    let sprite = doc.sprite();
    assert_eq!(sprite.total_frames(), 4);
    assert_eq!(cel_value(&doc, layer, 1), Some(10));
    assert_eq!(cel_value(&doc, layer, 2), Some(30), "old frame 3 renumbered");
    assert!(doc.sprite().layer(layer).cel(3).is_none());

    doc.undo();
    assert_eq!(doc.sprite(), &before);
    assert_eq!(cel_value(&doc, layer, 2), Some(20));
}

#[test]
fn remove_frame_clamps_the_current_frame() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(5);
        tx.set_current_frame(4);
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "remove last");
        tx.remove_frame(4);
        tx.commit();
    }
    assert_eq!(doc.sprite().total_frames(), 4);
    assert_eq!(doc.sprite().current_frame(), 3);
}

#[test]
fn move_frame_before_rotates_cels_and_durations() {
    let mut doc = document();
    // 4 frames with distinct durations and cels.
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(4);
        let layer = tx.new_layer();
        for frame in 0..4 {
            tx.set_frame_duration(frame, 10 * (frame + 1));
            let index = stocked(&mut tx, frame + 1);
            tx.add_cel(layer, frame, Cel::new(index));
        }
        tx.commit();
        layer
    };
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "move frame 0 before 3");
        tx.move_frame_before(0, 3);
        tx.commit();
    }
    // Frame 0 content lands in slot 2; frames 1 and 2 shift down by one.
    assert_eq!(doc.sprite().durations(), &[20, 30, 10, 40]);
    assert_eq!(cel_value(&doc, layer, 0), Some(2));
    assert_eq!(cel_value(&doc, layer, 1), Some(3));
    assert_eq!(cel_value(&doc, layer, 2), Some(1));
    assert_eq!(cel_value(&doc, layer, 3), Some(4));

    doc.undo();
    assert_eq!(doc.sprite(), &before);

    doc.redo();
    assert_eq!(cel_value(&doc, layer, 2), Some(1));
}

#[test]
fn move_frame_before_toward_the_past() {
    let mut doc = document();
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(4);
        let layer = tx.new_layer();
        for frame in [1, 3] {
            let index = stocked(&mut tx, frame + 1);
            tx.add_cel(layer, frame, Cel::new(index));
        }
        tx.commit();
        layer
    };
    {
        let mut tx = Transaction::new(&mut doc, "move frame 3 before 1");
        tx.move_frame_before(3, 1);
        tx.commit();
    }
    // Old frame 3 lands at 1; old 1 and 2 shift up by one.
    assert_eq!(cel_value(&doc, layer, 1), Some(4));
    assert_eq!(cel_value(&doc, layer, 2), Some(2));
    assert!(doc.sprite().layer(layer).cel(3).is_none());
}

#[test]
fn move_frame_before_out_of_range_is_a_noop() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(3);
        tx.commit();
    }
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "noop moves");
        tx.move_frame_before(1, 1);
        tx.move_frame_before(7, 1);
        tx.move_frame_before(1, 7);
        tx.commit();
    }
    assert_eq!(doc.sprite(), &before);
}

#[test]
fn constant_frame_rate_applies_everywhere_and_restores() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(3);
        tx.set_frame_duration(1, 55);
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "constant rate");
        tx.set_constant_frame_rate(25);
        tx.commit();
    }
    assert_eq!(doc.sprite().durations(), &[25, 25, 25]);
    doc.undo();
    assert_eq!(doc.sprite().durations(), &[100, 55, 100]);
}

#[test]
#[should_panic(expected = "cannot remove the only frame")]
fn removing_the_last_frame_is_a_precondition_violation() {
    let mut doc = document();
    let mut tx = Transaction::new(&mut doc, "misuse");
    tx.remove_frame(0);
}
