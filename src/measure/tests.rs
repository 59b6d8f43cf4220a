use eframe::egui::pos2;

use crate::commands::connected_components;
use crate::model::{ImageDocument, MeasurementScale, PixelBuffer, PixelDepth, PixelRect};
use crate::overlay::{Annotation, PointerEvent, PointerKind};

use super::{
    MeasureMode, MeasureOutcome, MeasurementController, MeasurementKind, MeasurementList,
    format_value, measure_areas,
};

fn blank_document() -> ImageDocument {
    let buffer = PixelBuffer::filled(20, 20, 1, 0.0).expect("buffer");
    ImageDocument::new("blank", buffer)
}

fn drag(
    controller: &mut MeasurementController,
    document: &mut ImageDocument,
    from: (f32, f32),
    to: (f32, f32),
) -> Option<MeasureOutcome> {
    let events = [
        PointerEvent::new(PointerKind::Press, pos2(from.0, from.1)),
        PointerEvent::new(PointerKind::Drag, pos2(to.0, to.1)),
        PointerEvent::new(PointerKind::Release, pos2(to.0, to.1)),
    ];
    events
        .into_iter()
        .filter_map(|event| controller.handle_pointer(document, event))
        .last()
}

#[test]
fn distance_is_euclidean_times_scale() {
    let mut document = blank_document();
    let mut controller = MeasurementController::start(MeasureMode::Distance, &document);
    assert_eq!(
        drag(&mut controller, &mut document, (0.0, 0.0), (3.0, 4.0)),
        Some(MeasureOutcome::Measured(1))
    );
    assert_eq!(controller.distances().rows()[0].value, 5.0);
    assert_eq!(controller.distances().rows()[0].unit, "px");

    document.set_scale(MeasurementScale::new(2.0, "mm"));
    drag(&mut controller, &mut document, (0.0, 0.0), (3.0, 4.0));
    let row = &controller.distances().rows()[1];
    assert_eq!((row.index, row.value, row.unit.as_str()), (2, 10.0, "mm"));

    let overlay = document.overlay();
    assert_eq!(overlay.items().len(), 4);
    assert_eq!(overlay.items()[1], Annotation::label(pos2(1.5, 2.0), "1"));
    assert!(overlay.live().is_none());

    let list = controller.finish(&mut document, true);
    assert_eq!(list.to_text(), "N\tDistance\tUnit\n1\t5\tpx\n2\t10\tmm");
}

#[test]
fn calibration_counts_pixels_inclusively_and_applies_on_accept() {
    let mut document = blank_document();
    let mut controller = MeasurementController::start(MeasureMode::Scale, &document);
    assert_eq!(
        drag(&mut controller, &mut document, (0.0, 0.0), (9.0, 0.0)),
        Some(MeasureOutcome::ReferenceSelected(10))
    );
    let calibration = controller.calibration_mut();
    calibration.set_known_length(5.0);
    assert!(!calibration.set_unit("m2"));
    assert!(calibration.set_unit("cm"));

    controller.finish(&mut document, true);
    assert_eq!(document.scale(), &MeasurementScale::new(0.5, "cm"));
    assert!(document.overlay().is_empty());
}

#[test]
fn cancelled_calibration_leaves_scale_alone() {
    let mut document = blank_document();
    let mut controller = MeasurementController::start(MeasureMode::Scale, &document);
    drag(&mut controller, &mut document, (0.0, 0.0), (4.0, 0.0));
    controller.calibration_mut().set_known_length(10.0);
    controller.finish(&mut document, false);
    assert_eq!(document.scale(), &MeasurementScale::default());
}

#[test]
fn crop_flow_reports_accepted_rectangle() {
    let mut document = blank_document();
    let mut controller = MeasurementController::start(MeasureMode::Crop, &document);
    assert_eq!(
        drag(&mut controller, &mut document, (2.0, 3.0), (12.0, 8.0)),
        Some(MeasureOutcome::RectangleSelected(PixelRect::new(2, 3, 10, 5)))
    );
    let accepted = controller.handle_pointer(
        &mut document,
        PointerEvent::new(PointerKind::DoubleClick, pos2(5.0, 5.0)),
    );
    assert_eq!(
        accepted,
        Some(MeasureOutcome::CropAccepted(PixelRect::new(2, 3, 10, 5)))
    );
}

#[test]
fn areas_skip_background_and_use_squared_scale() {
    let mut samples = vec![0.0; 36];
    for index in [0, 1, 6, 7, 28, 29] {
        samples[index] = 255.0;
    }
    let buffer = PixelBuffer::from_samples(6, 6, 1, samples, PixelDepth::U8).expect("buffer");
    let mut document =
        ImageDocument::new("blobs", buffer).with_scale(MeasurementScale::new(0.5, "um"));
    let components = connected_components(document.current());

    let list = measure_areas(&mut document, &components);
    assert_eq!(list.kind(), MeasurementKind::Area);
    assert_eq!(list.len(), 2);
    assert_eq!(list.rows()[0].value, 1.0);
    assert_eq!(list.rows()[1].value, 0.5);
    assert_eq!(list.rows()[0].unit, "um²");
    assert!(document.areas_measured());
    assert_eq!(document.overlay().items()[0], Annotation::label(pos2(0.5, 0.5), "1"));
}

#[test]
fn values_print_compactly() {
    assert_eq!(format_value(5.0), "5");
    assert_eq!(format_value(2.5), "2.5");
    assert_eq!(format_value(1.0 / 3.0), "0.3333");
    let empty = MeasurementList::new(MeasurementKind::Area);
    assert_eq!(empty.to_text(), "N\tArea\tUnit");
}
