use super::*;
use crate::document::Document;
use crate::document::cel::Cel;
use crate::document::sprite::Sprite;
use crate::raster::color::{graya_value, rgba};
use crate::raster::mask::Mask;

fn document() -> Document {
    Document::new(Sprite::new(ColorMode::Rgba, 4, 4).unwrap())
}

/// A committed transaction installing one image layer with a numbered 4x4
/// cel image at the origin.
fn with_numbered_layer(doc: &mut Document) -> crate::document::layer::LayerId {
    let mut tx = Transaction::new(doc, "setup");
    let layer = tx.new_layer();
    let mut image = Surface::new(ColorMode::Rgba, 4, 4).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            image.put_pixel(x, y, rgba((y * 4 + x) as u8 + 1, 0, 0, 255));
        }
    }
    let index = tx.add_image_in_stock(image);
    tx.add_cel(layer, 0, Cel::new(index));
    tx.commit();
    layer
}

#[test]
fn set_sprite_size_roundtrips_under_undo() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "resize");
        tx.set_sprite_size(8, 2);
        tx.commit();
    }
    assert_eq!((doc.sprite().width(), doc.sprite().height()), (8, 2));
    doc.undo();
    assert_eq!((doc.sprite().width(), doc.sprite().height()), (4, 4));
}

#[test]
#[should_panic(expected = "must be positive")]
fn zero_sprite_size_is_a_precondition_violation() {
    let mut doc = document();
    let mut tx = Transaction::new(&mut doc, "resize");
    tx.set_sprite_size(0, 2);
}

#[test]
fn frame_count_shrink_restores_durations_on_undo() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "setup frames");
        tx.set_frame_count(3);
        tx.set_frame_duration(1, 20);
        tx.set_frame_duration(2, 30);
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "shrink");
        tx.set_frame_count(1);
        tx.commit();
    }
    assert_eq!(doc.sprite().durations(), &[100]);
    doc.undo();
    assert_eq!(doc.sprite().durations(), &[100, 20, 30]);
}

#[test]
fn crop_sprite_moves_cels_and_mask() {
    let mut doc = document();
    let layer = with_numbered_layer(&mut doc);
    {
        let mut tx = Transaction::new(&mut doc, "select");
        tx.copy_to_current_mask(&Mask::from_rect(IRect::new(2, 2, 2, 2)));
        tx.commit();
    }
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "crop");
        tx.crop_sprite(1, 1, 2, 2, 0).unwrap();
        tx.commit();
    }
    let sprite = doc.sprite();
    assert_eq!((sprite.width(), sprite.height()), (2, 2));
    // Non-background cels are displaced, their pixels untouched.
    let cel = sprite.layer(layer).cel(0).unwrap();
    assert_eq!((cel.x, cel.y), (-1, -1));
    assert_eq!(sprite.stock().get(cel.image).width(), 4);
    // The mask follows the crop offset.
    assert_eq!(sprite.mask().bounds(), IRect::new(1, 1, 2, 2));

    doc.undo();
    assert_eq!(doc.sprite(), &before);
}

#[test]
fn crop_sprite_crops_background_pixels() {
    let mut doc = document();
    let layer = with_numbered_layer(&mut doc);
    {
        let mut tx = Transaction::new(&mut doc, "to background");
        tx.background_from_layer(layer, 0).unwrap();
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "crop");
        tx.crop_sprite(1, 1, 2, 2, 0).unwrap();
        tx.commit();
    }
    let sprite = doc.sprite();
    let cel = sprite.layer(layer).cel(0).unwrap();
    assert_eq!((cel.x, cel.y), (0, 0));
    let image = sprite.stock().get(cel.image);
    assert_eq!((image.width(), image.height()), (2, 2));
    // Central 2x2 block of the numbered source.
    assert_eq!(
        image.pixels(),
        &[
            rgba(6, 0, 0, 255),
            rgba(7, 0, 0, 255),
            rgba(10, 0, 0, 255),
            rgba(11, 0, 0, 255),
        ]
    );
}

#[test]
fn autocrop_is_a_silent_noop_on_uniform_content() {
    let mut doc = document();
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "autocrop");
        tx.autocrop_sprite(0).unwrap();
        tx.commit();
    }
    assert_eq!(doc.sprite(), &before);
    assert!(doc.history().undo_label().is_some());
}

#[test]
fn autocrop_tightens_to_differing_pixels() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "setup");
        let layer = tx.new_layer();
        let mut image = Surface::new(ColorMode::Rgba, 4, 4).unwrap();
        image.put_pixel(1, 1, rgba(1, 2, 3, 255));
        image.put_pixel(2, 2, rgba(4, 5, 6, 255));
        let index = tx.add_image_in_stock(image);
        tx.add_cel(layer, 0, Cel::new(index));
        tx.commit();
    }
    {
        let mut tx = Transaction::new(&mut doc, "autocrop");
        tx.autocrop_sprite(0).unwrap();
        tx.commit();
    }
    assert_eq!((doc.sprite().width(), doc.sprite().height()), (2, 2));
}

#[test]
fn set_image_mode_is_a_noop_for_the_same_mode() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "mode");
        tx.set_image_mode(ColorMode::Rgba, DitherMethod::None).unwrap();
        tx.commit();
    }
    assert!(
        doc.history()
            .undo_label()
            .is_some()
    );
    let before = doc.sprite().clone();
    doc.undo();
    assert_eq!(doc.sprite(), &before);
}

#[test]
fn set_image_mode_converts_stock_and_resets_palettes_for_grayscale() {
    let mut doc = document();
    let layer = with_numbered_layer(&mut doc);
    {
        let mut tx = Transaction::new(&mut doc, "extra palette");
        tx.sprite_mut().insert_palette(1, Palette::new(vec![rgba(1, 2, 3, 255)]));
        tx.commit();
    }
    let before = doc.sprite().clone();
    {
        let mut tx = Transaction::new(&mut doc, "to grayscale");
        tx.set_image_mode(ColorMode::Grayscale, DitherMethod::None).unwrap();
        tx.commit();
    }
    let sprite = doc.sprite();
    assert_eq!(sprite.mode(), ColorMode::Grayscale);
    assert_eq!(sprite.palettes().len(), 1);
    let cel = sprite.layer(layer).cel(0).unwrap();
    let image = sprite.stock().get(cel.image);
    assert_eq!(image.mode(), ColorMode::Grayscale);
    // luma of rgba(1, 0, 0, 255) is 0; of rgba(16, 0, 0, 255) is 4.
    assert_eq!(graya_value(image.pixel(0, 0)), 0);
    assert_eq!(graya_value(image.pixel(3, 3)), 4);

    doc.undo();
    assert_eq!(doc.sprite(), &before);
}
