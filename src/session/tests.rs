use std::cell::RefCell;
use std::rc::Rc;

use ndarray::Array2;

use crate::commands::{BlurMethod, BlurParams, OpsError, blur, invert};
use crate::model::{ImageDocument, PixelBuffer, PixelDepth};

use super::{DocumentEvent, EditOutcome, EditSession, EventBus};

fn ramp_document() -> ImageDocument {
    let plane = Array2::from_shape_fn((12, 16), |(y, x)| ((y * 16 + x) % 256) as f32);
    ImageDocument::new("ramp", PixelBuffer::from_gray(plane, PixelDepth::U8))
}

fn blur_with(size: usize) -> BlurParams {
    BlurParams {
        method: BlurMethod::Average,
        size,
    }
}

#[test]
fn rollback_restores_the_backup_bit_for_bit() {
    let document = ramp_document();
    let original = document.current().clone();
    let mut session = EditSession::begin("blur", document);

    for size in [3, 5, 7] {
        session.recompute(blur, &blur_with(size)).expect("recompute");
    }
    assert_ne!(session.document().current(), &original);

    let (document, event) = session.end(false);
    assert_eq!(document.current(), &original);
    assert_eq!(
        event,
        DocumentEvent::Updated {
            operation: "blur",
            outcome: EditOutcome::RolledBack
        }
    );
}

#[test]
fn commit_keeps_only_the_last_recompute() {
    let document = ramp_document();
    let original = document.current().clone();
    let expected = blur(&original, &blur_with(5)).expect("direct blur");

    let mut session = EditSession::begin("blur", document);
    session.recompute(blur, &blur_with(3)).expect("first");
    session.recompute(blur, &blur_with(5)).expect("second");
    session.confirm();
    let (document, event) = session.close();

    assert_eq!(document.current(), &expected);
    assert_eq!(document.previous(), Some(&original));
    assert!(matches!(
        event,
        DocumentEvent::Updated {
            outcome: EditOutcome::Committed,
            ..
        }
    ));
}

#[test]
fn closing_without_confirm_rolls_back() {
    let document = ramp_document();
    let original = document.current().clone();
    let mut session = EditSession::begin("invert", document);
    session
        .recompute(|buffer, _: &()| invert(buffer), &())
        .expect("invert");
    assert!(!session.is_committed());
    let (document, _) = session.close();
    assert_eq!(document.current(), &original);
}

#[test]
fn identical_params_reproduce_identical_previews() {
    let mut session = EditSession::begin("blur", ramp_document());
    session.recompute(blur, &blur_with(5)).expect("first");
    let first = session.document().current().clone();
    session.recompute(blur, &blur_with(7)).expect("other");
    session.recompute(blur, &blur_with(5)).expect("again");
    assert_eq!(session.document().current(), &first);
}

#[test]
fn failed_recompute_keeps_the_previous_preview() {
    let mut session = EditSession::begin("blur", ramp_document());
    session.recompute(blur, &blur_with(3)).expect("preview");
    let preview = session.document().current().clone();
    let error = session
        .recompute(
            |_, _: &()| Err(OpsError::InvalidParams("nope".into())),
            &(),
        )
        .expect_err("must fail");
    assert!(error.to_string().contains("nope"));
    assert_eq!(session.document().current(), &preview);
}

#[test]
fn event_bus_fans_out_to_every_observer() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::default();
    for _ in 0..2 {
        let seen = Rc::clone(&seen);
        bus.subscribe(move |event: &DocumentEvent| seen.borrow_mut().push(event.clone()));
    }
    bus.publish(&DocumentEvent::Activated { index: 1 });
    assert_eq!(seen.borrow().len(), 2);
    assert!(format!("{bus:?}").contains("observers: 2"));
}
