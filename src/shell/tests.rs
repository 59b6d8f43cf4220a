use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui::pos2;
use image::{ImageBuffer, ImageFormat, ImageReader, Rgb};
use ndarray::{Array2, s};
use tempfile::tempdir;

use crate::commands::BlurMethod;
use crate::measure::{MeasureMode, MeasureOutcome};
use crate::model::{CoreError, ImageDocument, MeasurementScale, PixelBuffer, PixelDepth, PixelRect};
use crate::overlay::{Annotation, PointerEvent, PointerKind};
use crate::session::{DocumentEvent, EditOutcome};
use crate::windows::{ActiveWindow, OperationKind};

use super::{Adjustment, ChannelSplit, DocumentShell, MenuAction, ShellError, ShellMode};

fn ramp(rows: usize, cols: usize) -> ImageDocument {
    let plane = Array2::from_shape_fn((rows, cols), |(y, x)| ((x * x + y * 7) % 256) as f32);
    ImageDocument::new("ramp", PixelBuffer::from_gray(plane, PixelDepth::U8))
}

fn shell_with(document: ImageDocument) -> DocumentShell {
    let mut shell = DocumentShell::default();
    shell.add_document(document).expect("idle shell");
    shell
}

fn drag(shell: &mut DocumentShell, from: (f32, f32), to: (f32, f32)) -> Option<MeasureOutcome> {
    [
        PointerEvent::new(PointerKind::Press, pos2(from.0, from.1)),
        PointerEvent::new(PointerKind::Drag, pos2(to.0, to.1)),
        PointerEvent::new(PointerKind::Release, pos2(to.0, to.1)),
    ]
    .into_iter()
    .filter_map(|event| shell.handle_pointer(event).expect("measuring"))
    .last()
}

#[test]
fn first_document_replaces_the_placeholder() {
    let mut shell = DocumentShell::default();
    assert_eq!(shell.len(), 1);
    assert!(!shell.has_image());
    assert_eq!(shell.add_document(ramp(4, 4)).expect("add"), 0);
    assert_eq!(shell.len(), 1);
    assert_eq!(shell.add_document(ramp(4, 4)).expect("add"), 1);
    assert_eq!(shell.active_index(), 1);
}

#[test]
fn second_operation_fails_fast_while_one_is_active() {
    let mut shell = shell_with(ramp(16, 16));
    shell.begin_operation(OperationKind::Blur).expect("begin");
    assert_eq!(shell.mode(), ShellMode::Operation(OperationKind::Blur));

    let busy = shell.begin_operation(OperationKind::Canny);
    assert!(matches!(
        busy,
        Err(ShellError::Busy(ShellMode::Operation(OperationKind::Blur)))
    ));
    assert!(matches!(
        shell.begin_measurement(MeasureMode::Distance),
        Err(ShellError::Busy(_))
    ));
    assert!(matches!(shell.switch_to(0), Err(ShellError::Busy(_))));
    assert!(matches!(
        shell.apply_adjustment(Adjustment::Invert),
        Err(ShellError::Busy(_))
    ));

    shell.finish_operation(false).expect("cancel");
    assert_eq!(shell.mode(), ShellMode::Idle);
    shell.begin_operation(OperationKind::Canny).expect("idle again");
}

#[test]
fn operation_preview_is_visible_through_the_tab_slot() {
    let document = ramp(16, 16);
    let original = document.current().clone();
    let mut shell = shell_with(document);
    shell.begin_operation(OperationKind::Blur).expect("begin");
    shell
        .edit_operation(|window| {
            if let ActiveWindow::Blur(blur) = window {
                blur.set_method(BlurMethod::Median);
                blur.set_size(5);
            }
        })
        .expect("recompute");

    let previewed = shell.active_document().expect("active").current().clone();
    assert_ne!(previewed, original);
    assert_eq!(shell.titles(), vec!["ramp"]);

    let event = shell.finish_operation(true).expect("commit");
    assert_eq!(
        event,
        DocumentEvent::Updated {
            operation: "blur",
            outcome: EditOutcome::Committed
        }
    );
    let document = shell.active_document().expect("active");
    assert_eq!(document.current(), &previewed);
    assert_eq!(document.previous(), Some(&original));
}

#[test]
fn cancelled_operation_restores_the_document() {
    let document = ramp(12, 12);
    let original = document.current().clone();
    let mut shell = shell_with(document);
    shell.begin_operation(OperationKind::Threshold).expect("begin");
    shell.finish_operation(false).expect("cancel");
    assert_eq!(shell.active_document().expect("active").current(), &original);
    assert!(matches!(
        shell.finish_operation(true),
        Err(ShellError::NotActive)
    ));
}

#[test]
fn observers_see_exactly_one_update_per_edit() {
    let mut shell = shell_with(ramp(8, 8));
    let updates = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&updates);
    shell.subscribe(move |event: &DocumentEvent| {
        if matches!(event, DocumentEvent::Updated { .. }) {
            *counter.borrow_mut() += 1;
        }
    });

    shell.begin_operation(OperationKind::Gradient).expect("begin");
    for size in [3, 5, 7] {
        shell
            .edit_operation(|window| {
                if let ActiveWindow::Gradient(gradient) = window {
                    gradient.set_size(size);
                }
            })
            .expect("recompute");
    }
    shell.finish_operation(true).expect("commit");
    assert_eq!(*updates.borrow(), 1);
}

#[test]
fn crop_selection_opens_the_sub_region_as_a_new_tab() {
    let document = ramp(80, 80);
    let expected = document.current().data().slice(s![10..60, 10..60, ..]).to_owned();
    let mut shell = shell_with(document);

    shell.begin_measurement(MeasureMode::Crop).expect("crop mode");
    let selected = drag(&mut shell, (10.0, 10.0), (60.0, 60.0));
    assert!(matches!(selected, Some(MeasureOutcome::RectangleSelected(_))));

    let accepted = shell
        .handle_pointer(PointerEvent::new(PointerKind::DoubleClick, pos2(30.0, 30.0)))
        .expect("measuring");
    assert!(matches!(accepted, Some(MeasureOutcome::CropAccepted(_))));
    assert_eq!(shell.mode(), ShellMode::Idle);
    assert_eq!(shell.len(), 2);
    assert_eq!(shell.active_index(), 1);

    let cropped = shell.active_document().expect("cropped");
    assert_eq!(cropped.title(), "ramp (crop)");
    assert_eq!((cropped.current().rows(), cropped.current().cols()), (50, 50));
    assert_eq!(cropped.current().data(), &expected);
    assert!(shell.document_at(0).expect("parent").overlay().is_empty());
}

#[test]
fn fractional_crop_touching_the_edge_stays_on_the_image() {
    let document = ramp(100, 100);
    let expected = document.current().data().slice(s![10..60, 51..100, ..]).to_owned();
    let mut shell = shell_with(document);

    shell.begin_measurement(MeasureMode::Crop).expect("crop mode");
    drag(&mut shell, (50.5, 10.0), (100.0, 60.0));
    shell
        .handle_pointer(PointerEvent::new(PointerKind::DoubleClick, pos2(70.0, 30.0)))
        .expect("crop accepted");

    assert_eq!(shell.mode(), ShellMode::Idle);
    assert_eq!(shell.len(), 2);
    let cropped = shell.active_document().expect("cropped");
    assert_eq!((cropped.current().rows(), cropped.current().cols()), (50, 49));
    assert_eq!(cropped.current().data(), &expected);
}

#[test]
fn crop_is_clipped_to_the_image() {
    let mut shell = shell_with(ramp(20, 20));
    shell.crop_active(PixelRect::new(15, 15, 10, 10)).expect("crop");
    let cropped = shell.active_document().expect("cropped");
    assert_eq!((cropped.current().rows(), cropped.current().cols()), (5, 5));

    shell.switch_to(0).expect("parent");
    assert!(matches!(
        shell.crop_active(PixelRect::new(20, 0, 4, 4)),
        Err(ShellError::Core(CoreError::EmptySelection))
    ));
    assert_eq!(shell.len(), 2);
}

#[test]
fn committed_operation_clears_the_overlay_and_cancel_keeps_it() {
    let mut document = ramp(16, 16);
    document
        .overlay_mut()
        .push(Annotation::line(pos2(1.0, 1.0), pos2(8.0, 8.0)));
    let mut shell = shell_with(document);

    shell.begin_operation(OperationKind::Blur).expect("begin");
    shell.finish_operation(false).expect("cancel");
    assert!(!shell.active_document().expect("active").overlay().is_empty());

    shell.begin_operation(OperationKind::Blur).expect("begin");
    shell.finish_operation(true).expect("commit");
    assert!(shell.active_document().expect("active").overlay().is_empty());
}

#[test]
fn initial_preview_is_published_once() {
    let mut shell = shell_with(ramp(16, 16));
    let events = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&events);
    shell.subscribe(move |event: &DocumentEvent| seen.borrow_mut().push(event.clone()));

    let event = shell.begin_operation(OperationKind::Blur).expect("begin");
    let previewed = DocumentEvent::Previewed { operation: "blur" };
    assert_eq!(event, Some(previewed.clone()));
    assert_eq!(*events.borrow(), vec![previewed]);
}

#[test]
fn distance_rows_survive_the_flow() {
    let mut shell = shell_with(ramp(20, 20));
    shell.begin_measurement(MeasureMode::Distance).expect("distance");
    assert_eq!(
        drag(&mut shell, (0.0, 0.0), (3.0, 4.0)),
        Some(MeasureOutcome::Measured(1))
    );
    let exited = shell
        .handle_pointer(PointerEvent::new(PointerKind::DoubleClick, pos2(1.0, 1.0)))
        .expect("measuring");
    assert_eq!(exited, Some(MeasureOutcome::Exited));
    assert_eq!(shell.mode(), ShellMode::Idle);
    let list = shell.last_measurements().expect("kept");
    assert_eq!(list.rows()[0].value, 5.0);
}

#[test]
fn accepted_calibration_sets_the_document_scale() {
    let mut shell = shell_with(ramp(20, 20));
    shell.begin_measurement(MeasureMode::Scale).expect("scale");
    assert_eq!(
        drag(&mut shell, (0.0, 0.0), (9.0, 0.0)),
        Some(MeasureOutcome::ReferenceSelected(10))
    );
    let calibration = shell.measurement_mut().expect("active").calibration_mut();
    calibration.set_known_length(5.0);
    assert!(calibration.set_unit("cm"));
    shell.finish_measurement(true).expect("accept");

    let scale = shell.active_document().expect("active").scale();
    assert_eq!(scale, &MeasurementScale::new(0.5, "cm"));
}

#[test]
fn particles_are_measured_once_per_image() {
    let mut plane = Array2::<f32>::zeros((8, 8));
    plane.slice_mut(s![1..3, 1..3]).fill(255.0);
    plane.slice_mut(s![5..7, 4..7]).fill(255.0);
    let mut shell = shell_with(ImageDocument::new(
        "blobs",
        PixelBuffer::from_gray(plane, PixelDepth::U8),
    ));

    let list = shell.measure_particles().expect("measure");
    assert_eq!(list.len(), 2);
    assert_eq!(list.rows()[0].value, 4.0);
    assert_eq!(list.rows()[1].value, 6.0);
    assert!(matches!(
        shell.measure_particles(),
        Err(ShellError::AlreadyMeasured)
    ));

    shell.apply_adjustment(Adjustment::Invert).expect("invert");
    assert!(shell.active_document().expect("active").overlay().is_empty());
    shell.measure_particles().expect("new pixels");
}

#[test]
fn adjustments_keep_one_undo_level() {
    let document = ramp(6, 6);
    let original = document.current().clone();
    let mut shell = shell_with(document);
    shell.apply_adjustment(Adjustment::Invert).expect("invert");
    assert_ne!(shell.active_document().expect("active").current(), &original);
    assert!(shell.undo().expect("undo"));
    assert_eq!(shell.active_document().expect("active").current(), &original);

    shell.apply_adjustment(Adjustment::Stretch).expect("stretch");
    shell.revert().expect("revert");
    let document = shell.active_document().expect("active");
    assert_eq!(document.current(), &original);
    assert!(document.previous().is_none());
    assert!(!shell.undo().expect("nothing to undo"));
}

#[test]
fn split_rgb_opens_three_gray_tabs() {
    let buffer = PixelBuffer::filled(2, 2, 3, 40.0).expect("buffer");
    let mut shell = shell_with(ImageDocument::new("color", buffer));
    let tabs = shell.split_channels(ChannelSplit::Rgb).expect("split");
    assert_eq!(tabs, vec![1, 2, 3]);
    assert_eq!(
        shell.titles(),
        vec!["color", "color (R)", "color (G)", "color (B)"]
    );
    assert_eq!(shell.document_at(3).expect("blue").current().channels(), 1);
}

#[test]
fn switching_tabs_clears_the_stale_overlay() {
    let mut shell = shell_with(ramp(20, 20));
    shell.add_document(ramp(10, 30)).expect("second");
    shell.switch_to(0).expect("switch");
    shell.begin_measurement(MeasureMode::Distance).expect("distance");
    drag(&mut shell, (0.0, 0.0), (5.0, 0.0));
    shell.finish_measurement(true).expect("finish");
    assert!(!shell.document_at(0).expect("first").overlay().is_empty());

    let summary = shell.switch_to(1).expect("switch");
    assert_eq!((summary.width, summary.height), (30, 10));
    assert!(shell.document_at(0).expect("first").overlay().is_empty());
}

#[test]
fn empty_tabs_and_bad_indices_are_rejected() {
    let mut shell = DocumentShell::default();
    assert!(matches!(
        shell.begin_operation(OperationKind::Blur),
        Err(ShellError::NoImage)
    ));
    assert!(matches!(shell.histogram(), Err(ShellError::NoImage)));
    assert!(matches!(shell.close_active(), Err(ShellError::LastDocument)));
    assert!(matches!(
        shell.switch_to(4),
        Err(ShellError::NoSuchDocument(4))
    ));
}

#[test]
fn closing_a_tab_activates_its_neighbour() {
    let mut shell = shell_with(ramp(4, 4));
    shell.add_document(ramp(5, 5)).expect("second");
    shell.close_active().expect("close");
    assert_eq!(shell.len(), 1);
    assert_eq!(shell.active_index(), 0);
}

#[test]
fn save_writes_jpeg_even_for_png_sources() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("input.png");
    let mut image = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(4, 3);
    image.put_pixel(1, 1, Rgb([10, 200, 30]));
    image.save(&source).expect("save png");

    let mut shell = DocumentShell::default();
    shell.open(&source).expect("open");
    let written = shell.save_active(dir.path().join("result.png")).expect("save");
    assert_eq!(written, dir.path().join("result.png.jpg"));
    let format = ImageReader::open(&written)
        .expect("reopen")
        .with_guessed_format()
        .expect("guess")
        .format();
    assert_eq!(format, Some(ImageFormat::Jpeg));
}

#[test]
fn menu_is_locked_while_a_flow_is_active() {
    let busy = ShellMode::Measurement(MeasureMode::Distance);
    assert!(MenuAction::About.is_enabled(busy, true));
    assert!(!MenuAction::Open.is_enabled(busy, true));
    assert!(!MenuAction::Blur.is_enabled(busy, true));
    assert!(MenuAction::Open.is_enabled(ShellMode::Idle, false));
    assert!(!MenuAction::Blur.is_enabled(ShellMode::Idle, false));
    assert!(MenuAction::Blur.is_enabled(ShellMode::Idle, true));
    assert_eq!(MenuAction::Crop.measurement(), Some(MeasureMode::Crop));
}
