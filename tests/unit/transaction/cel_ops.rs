use super::*;
use crate::document::Document;
use crate::document::sprite::Sprite;
use crate::document::stock::ImageIndex;
use crate::raster::color::ColorMode;
use crate::raster::surface::Surface;

fn document_with_layer() -> (Document, LayerId) {
    let mut doc = Document::new(Sprite::new(ColorMode::Rgba, 4, 4).unwrap());
    let layer = {
        let mut tx = Transaction::new(&mut doc, "setup");
        tx.set_frame_count(3);
        let layer = tx.new_layer();
        tx.commit();
        layer
    };
    (doc, layer)
}

fn stocked(tx: &mut Transaction<'_>, value: u32) -> crate::document::stock::ImageIndex {
    let mut image = Surface::new(ColorMode::Rgba, 2, 2).unwrap();
    image.clear(value);
    tx.add_image_in_stock(image)
}

#[test]
fn removing_the_last_user_frees_the_slot() {
    let (mut doc, layer) = document_with_layer();
    let index = {
        let mut tx = Transaction::new(&mut doc, "share");
        let index = stocked(&mut tx, 7);
        tx.add_cel(layer, 0, Cel::new(index));
        tx.add_cel(layer, 1, Cel::new(index));
        tx.commit();
        index
    };
    {
        let mut tx = Transaction::new(&mut doc, "remove one");
        tx.remove_cel(layer, 0);
        tx.commit();
    }
    assert!(
        doc.sprite().stock().is_live(index),
        "slot still shared by the frame-1 cel"
    );
    {
        let mut tx = Transaction::new(&mut doc, "remove last");
        tx.remove_cel(layer, 1);
        tx.commit();
    }
    assert!(!doc.sprite().stock().is_live(index));

    doc.undo();
    assert!(doc.sprite().stock().is_live(index));
    assert!(doc.sprite().layer(layer).cel(1).is_some());
    doc.undo();
    assert!(doc.sprite().layer(layer).cel(0).is_some());
}

#[test]
fn set_cel_position_roundtrips_under_undo() {
    let (mut doc, layer) = document_with_layer();
    {
        let mut tx = Transaction::new(&mut doc, "place");
        let index = stocked(&mut tx, 1);
        tx.add_cel(layer, 0, Cel::new(index));
        tx.set_cel_position(layer, 0, 3, -2);
        tx.commit();
    }
    let cel = *doc.sprite().layer(layer).cel(0).unwrap();
    assert_eq!((cel.x, cel.y), (3, -2));
    doc.undo();
    assert!(doc.sprite().layer(layer).cel(0).is_none());
}

#[test]
fn set_cel_frame_rekeys_and_restores() {
    let (mut doc, layer) = document_with_layer();
    {
        let mut tx = Transaction::new(&mut doc, "move");
        let index = stocked(&mut tx, 1);
        tx.add_cel(layer, 0, Cel::new(index));
        tx.set_cel_frame(layer, 0, 2);
        tx.commit();
    }
    assert!(doc.sprite().layer(layer).cel(0).is_none());
    assert!(doc.sprite().layer(layer).cel(2).is_some());

    doc.undo();
    assert!(doc.sprite().layer(layer).cel(0).is_none(), "setup is undone too");
    doc.redo();
    assert!(doc.sprite().layer(layer).cel(2).is_some());
}

#[test]
fn current_cel_requires_an_image_layer_selection_with_content() {
    let (mut doc, layer) = document_with_layer();
    {
        let mut tx = Transaction::new(&mut doc, "inspect");
        assert_eq!(tx.current_cel(), None, "selected layer has no cel yet");
        let index = stocked(&mut tx, 1);
        tx.add_cel(layer, 0, Cel::new(index));
        let (id, frame, cel) = tx.current_cel().expect("cel at current frame");
        assert_eq!(id, layer);
        assert_eq!(frame, 0);
        assert_eq!(cel.image, index);

        tx.set_current_layer(None);
        assert_eq!(tx.current_cel(), None);
        tx.commit();
    }
}

#[test]
#[should_panic(expected = "vacant stock slot")]
fn adding_a_cel_over_a_vacant_slot_is_a_contract_breach() {
    let (mut doc, layer) = document_with_layer();
    let mut tx = Transaction::new(&mut doc, "misuse");
    tx.add_cel(layer, 0, Cel::new(ImageIndex::from_usize(9)));
}
