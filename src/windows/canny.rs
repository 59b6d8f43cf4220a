use crate::commands::{
    self, CANNY_APERTURES, CannyParams, auto_bounds, canny, channel_histogram, channel_mean,
    median_from_histogram,
};
use crate::model::PixelBuffer;

use super::{OperationKind, OperationWindow};

pub const CANNY_SLIDER_MAX: u32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CannyThresholdMode {
    Manual,
    Mean,
    #[default]
    Median,
}

/// Hysteresis bounds are either the two sliders or derived from the mean
/// or median of the source's first channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CannyWindow {
    mode: CannyThresholdMode,
    low: u32,
    high: u32,
    aperture: usize,
    l2_gradient: bool,
    mean: f64,
    median: f64,
}

impl CannyWindow {
    pub fn new(source: &PixelBuffer) -> Self {
        let median = median_from_histogram(&channel_histogram(source, 0)) as f64;
        Self {
            mode: CannyThresholdMode::default(),
            low: 50,
            high: 150,
            aperture: CANNY_APERTURES[0],
            l2_gradient: false,
            mean: channel_mean(source, 0),
            median,
        }
    }

    pub fn mode(&self) -> CannyThresholdMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CannyThresholdMode) {
        self.mode = mode;
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    /// Raising the lower slider past the upper one drags the upper along.
    pub fn set_low(&mut self, value: u32) {
        self.low = value.min(CANNY_SLIDER_MAX);
        self.high = self.high.max(self.low);
    }

    pub fn set_high(&mut self, value: u32) {
        self.high = value.min(CANNY_SLIDER_MAX);
        self.low = self.low.min(self.high);
    }

    pub fn aperture(&self) -> usize {
        self.aperture
    }

    /// Snaps to the nearest supported aperture.
    pub fn set_aperture(&mut self, aperture: usize) {
        self.aperture = CANNY_APERTURES
            .iter()
            .copied()
            .min_by_key(|candidate| candidate.abs_diff(aperture))
            .unwrap_or(CANNY_APERTURES[0]);
    }

    pub fn l2_gradient(&self) -> bool {
        self.l2_gradient
    }

    pub fn set_l2_gradient(&mut self, l2: bool) {
        self.l2_gradient = l2;
    }

    pub fn bounds(&self) -> (f64, f64) {
        match self.mode {
            CannyThresholdMode::Manual => (f64::from(self.low), f64::from(self.high)),
            CannyThresholdMode::Mean => auto_bounds(self.mean),
            CannyThresholdMode::Median => auto_bounds(self.median),
        }
    }
}

impl OperationWindow for CannyWindow {
    type Params = CannyParams;

    const KIND: OperationKind = OperationKind::Canny;

    fn params(&self) -> CannyParams {
        let (low, high) = self.bounds();
        CannyParams {
            low,
            high,
            aperture: self.aperture,
            l2_gradient: self.l2_gradient,
        }
    }

    fn apply(source: &PixelBuffer, params: &CannyParams) -> commands::Result<PixelBuffer> {
        canny(source, params)
    }
}
