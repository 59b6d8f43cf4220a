use ndarray::Array2;

use crate::commands::{
    AdaptiveMethod, BlurMethod, GradientMethod, MorphologyOp, ThresholdParams, ThresholdType,
};
use crate::model::{ImageDocument, PixelBuffer, PixelDepth};
use crate::session::{DocumentEvent, EditSession};

use super::{
    ActiveWindow, BlurWindow, CannyThresholdMode, CannyWindow, GradientWindow, MorphologyWindow,
    OperationKind, OperationWindow, ThresholdStyle, ThresholdWindow,
};

fn constant(value: f32) -> PixelBuffer {
    PixelBuffer::from_gray(Array2::from_elem((16, 16), value), PixelDepth::U8)
}

fn step() -> PixelBuffer {
    let plane = Array2::from_shape_fn((16, 16), |(_, x)| if x < 8 { 0.0 } else { 255.0 });
    PixelBuffer::from_gray(plane, PixelDepth::U8)
}

#[test]
fn blur_sizes_are_clamped_and_made_odd() {
    let mut window = BlurWindow::default();
    window.set_size(4);
    assert_eq!(window.size(), 4);
    window.set_method(BlurMethod::Gaussian);
    assert_eq!(window.size(), 5);
    window.set_size(0);
    assert_eq!(window.size(), 1);
    window.set_size(500);
    assert_eq!(window.size(), 99);
}

#[test]
fn canny_sliders_stay_ordered() {
    let mut window = CannyWindow::new(&constant(100.0));
    window.set_mode(CannyThresholdMode::Manual);
    window.set_low(200);
    assert_eq!((window.low(), window.high()), (200, 200));
    window.set_high(20);
    assert_eq!((window.low(), window.high()), (20, 20));
    window.set_aperture(6);
    assert!(matches!(window.aperture(), 5 | 7));
    window.set_aperture(1);
    assert_eq!(window.aperture(), 3);
}

#[test]
fn canny_median_mode_uses_the_histogram() {
    let window = CannyWindow::new(&constant(100.0));
    assert_eq!(window.mode(), CannyThresholdMode::Median);
    let (low, high) = window.bounds();
    assert!((low - 200.0 / 3.0).abs() < 1e-9);
    assert!((high - 400.0 / 3.0).abs() < 1e-9);
}

#[test]
fn scharr_keeps_a_single_first_order_derivative() {
    let mut window = GradientWindow::default();
    window.set_size(7);
    window.set_method(GradientMethod::Scharr);
    assert_eq!((window.dx(), window.dy(), window.size()), (1, 0, 3));
    window.set_dy(1);
    assert_eq!((window.dx(), window.dy()), (0, 1));
    window.set_dx(2);
    assert_eq!((window.dx(), window.dy()), (1, 0));
    window.set_size(5);
    assert_eq!(window.size(), 3);
}

#[test]
fn sobel_never_has_both_orders_zero() {
    let mut window = GradientWindow::default();
    window.set_dx(0);
    assert_eq!((window.dx(), window.dy()), (0, 1));
    window.set_dy(0);
    assert_eq!((window.dx(), window.dy()), (1, 0));
    window.set_dx(9);
    assert_eq!(window.dx(), 2);
    window.set_size(4);
    assert_eq!(window.size(), 5);
}

#[test]
fn laplacian_disables_magnitude_and_accepts_size_one() {
    let mut window = GradientWindow::default();
    window.set_magnitude(true);
    window.set_method(GradientMethod::Laplacian);
    assert!(!window.magnitude());
    window.set_magnitude(true);
    assert!(!window.magnitude());
    window.set_size(1);
    assert_eq!(window.size(), 1);
    window.set_size(40);
    assert_eq!(window.size(), 31);
    window.set_method(GradientMethod::Sobel);
    assert_eq!(window.size(), 7);
}

#[test]
fn magnitude_turns_absolute_off() {
    let mut window = GradientWindow::default();
    window.set_absolute(true);
    window.set_magnitude(true);
    assert!(!window.absolute());
    window.set_absolute(true);
    assert!(!window.absolute());
    assert!(!window.orders_enabled());
}

#[test]
fn every_gradient_window_state_is_accepted() {
    let source = step();
    let mut window = GradientWindow::default();
    for method in [
        GradientMethod::Sobel,
        GradientMethod::Scharr,
        GradientMethod::Laplacian,
    ] {
        window.set_method(method);
        for magnitude in [false, true] {
            window.set_magnitude(magnitude);
            GradientWindow::apply(&source, &window.params()).expect("valid params");
        }
    }
}

#[test]
fn open_and_close_run_once() {
    let mut window = MorphologyWindow::default();
    window.set_iterations(4);
    assert_eq!(window.iterations(), 4);
    window.set_op(MorphologyOp::Open);
    assert_eq!(window.iterations(), 1);
    window.set_iterations(6);
    assert_eq!(window.iterations(), 1);
    window.set_op(MorphologyOp::Dilate);
    window.set_iterations(6);
    assert_eq!(window.iterations(), 6);
}

#[test]
fn morphology_element_follows_size() {
    let mut window = MorphologyWindow::default();
    window.set_size(6);
    assert_eq!(window.size(), 7);
    assert_eq!(window.element().dim(), (7, 7));
}

#[test]
fn threshold_adaptive_switch_resets_the_slider() {
    let mut window = ThresholdWindow::new(&constant(10.0));
    assert_eq!(window.histogram()[10], 256);
    assert_eq!(window.marker(), Some(127.5));

    window.set_otsu(true);
    assert_eq!(window.marker(), None);
    window.set_adaptive(true);
    assert!(!window.otsu());
    assert_eq!(window.value(), 0);
    assert_eq!(window.value_range(), -128..=127);
    window.set_value(-300);
    assert_eq!(window.value(), -128);
    window.set_block_size(8);
    assert_eq!(window.block_size(), 9);
    assert_eq!(
        window.params(),
        ThresholdParams::Adaptive {
            method: AdaptiveMethod::Mean,
            block_size: 9,
            offset: -128,
            inverted: false,
        }
    );

    window.set_adaptive(false);
    assert_eq!(window.value(), 0);
    assert_eq!(window.marker(), Some(0.5));
}

#[test]
fn threshold_style_maps_to_kind() {
    let mut window = ThresholdWindow::new(&constant(10.0));
    window.set_style(ThresholdStyle::ToZero);
    window.set_inverted(true);
    assert!(matches!(
        window.params(),
        ThresholdParams::Global {
            kind: ThresholdType::ToZeroInverted,
            ..
        }
    ));
    window.set_style(ThresholdStyle::Truncate);
    assert!(!window.inverted());
    window.set_inverted(true);
    assert!(!window.inverted());
}

#[test]
fn active_window_previews_through_the_session() {
    let document = ImageDocument::new("step", step());
    let original = document.current().clone();
    for kind in OperationKind::ALL {
        let window = ActiveWindow::open(kind, document.current());
        assert_eq!(window.kind(), kind);
        let mut session = EditSession::begin(kind.name(), document.clone());
        let event = window.preview(&mut session).expect("default params are valid");
        assert_eq!(
            event,
            DocumentEvent::Previewed {
                operation: kind.name()
            }
        );
        let (restored, _) = session.end(false);
        assert_eq!(restored.current(), &original);
    }
}
