use super::*;
use crate::raster::color::ColorMode;

fn document() -> Document {
    Document::new(Sprite::new(ColorMode::Rgba, 4, 4).unwrap())
}

#[test]
fn dropping_uncommitted_rolls_everything_back() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "tweak");
        tx.set_frame_duration(0, 42);
        assert_eq!(tx.document().sprite().frame_duration(0), 42);
        // no commit
    }
    assert_eq!(doc.sprite().frame_duration(0), 100);
    assert_eq!(doc.history().undo_depth(), 0);
    assert_eq!(doc.history().redo_depth(), 0);
}

#[test]
fn committed_transaction_stays_applied_and_is_undoable() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "tweak");
        tx.set_frame_duration(0, 42);
        tx.commit();
    }
    assert_eq!(doc.sprite().frame_duration(0), 42);
    assert_eq!(doc.history().undo_depth(), 1);
    assert_eq!(doc.history().undo_label(), Some("tweak"));

    assert!(doc.undo());
    assert_eq!(doc.sprite().frame_duration(0), 100);
    assert!(doc.redo());
    assert_eq!(doc.sprite().frame_duration(0), 42);
}

#[test]
fn commit_is_final_for_the_guard() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "tweak");
        tx.set_frame_duration(0, 42);
        tx.commit();
        assert!(tx.is_committed());
        // Dropping after commit must not alter the document further.
    }
    assert_eq!(doc.sprite().frame_duration(0), 42);
}

#[test]
fn disabled_journal_means_no_group_and_no_rollback() {
    let mut doc = document();
    doc.set_journal_enabled(false);
    {
        let mut tx = Transaction::new(&mut doc, "tweak");
        tx.set_frame_duration(0, 42);
        // Abandoned, but nothing was logged: the mutation sticks.
    }
    assert_eq!(doc.sprite().frame_duration(0), 42);
    assert_eq!(doc.history().undo_depth(), 0);
    assert!(!doc.history().has_open_group());
}

#[test]
fn rollback_clears_prior_redo_history() {
    let mut doc = document();
    {
        let mut tx = Transaction::new(&mut doc, "first");
        tx.set_frame_duration(0, 5);
        tx.commit();
    }
    doc.undo();
    assert_eq!(doc.history().redo_depth(), 1);
    {
        let _tx = Transaction::new(&mut doc, "abandoned");
    }
    assert_eq!(doc.history().redo_depth(), 0);
}

#[test]
#[should_panic(expected = "already committed")]
fn committing_twice_panics() {
    let mut doc = document();
    let mut tx = Transaction::new(&mut doc, "tweak");
    tx.commit();
    tx.commit();
}

#[test]
#[should_panic(expected = "already open")]
fn a_second_open_group_is_a_fatal_usage_error() {
    let mut doc = document();
    doc.history.begin_group("already open");
    let _tx = Transaction::new(&mut doc, "two");
}
