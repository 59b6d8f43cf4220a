use std::ops::RangeInclusive;

use crate::commands::{
    self, AdaptiveMethod, ThresholdParams, ThresholdType, channel_histogram, threshold,
};
use crate::model::PixelBuffer;

use super::{OperationKind, OperationWindow};

pub const GLOBAL_RANGE: RangeInclusive<i32> = 0..=255;
pub const OFFSET_RANGE: RangeInclusive<i32> = -128..=127;
pub const MAX_BLOCK_SIZE: usize = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdStyle {
    #[default]
    Binary,
    Truncate,
    ToZero,
}

/// One slider serves as the global cut or, in adaptive mode, as the signed
/// offset subtracted from the local mean.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdWindow {
    value: i32,
    style: ThresholdStyle,
    inverted: bool,
    otsu: bool,
    adaptive: bool,
    method: AdaptiveMethod,
    block_size: usize,
    histogram: Vec<u64>,
}

impl ThresholdWindow {
    pub fn new(source: &PixelBuffer) -> Self {
        Self {
            value: 127,
            style: ThresholdStyle::Binary,
            inverted: false,
            otsu: false,
            adaptive: false,
            method: AdaptiveMethod::Mean,
            block_size: 3,
            histogram: channel_histogram(source, 0),
        }
    }

    pub fn histogram(&self) -> &[u64] {
        &self.histogram
    }

    /// Position of the cut marker on the histogram; hidden in adaptive mode
    /// and while Otsu picks the cut.
    pub fn marker(&self) -> Option<f32> {
        (!self.adaptive && !self.otsu).then_some(self.value as f32 + 0.5)
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn value_range(&self) -> RangeInclusive<i32> {
        if self.adaptive {
            OFFSET_RANGE
        } else {
            GLOBAL_RANGE
        }
    }

    pub fn set_value(&mut self, value: i32) {
        if self.otsu {
            return;
        }
        let range = self.value_range();
        self.value = value.clamp(*range.start(), *range.end());
    }

    pub fn style(&self) -> ThresholdStyle {
        self.style
    }

    /// Truncation has no inverted form.
    pub fn set_style(&mut self, style: ThresholdStyle) {
        self.style = style;
        if style == ThresholdStyle::Truncate {
            self.inverted = false;
        }
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn inverted_enabled(&self) -> bool {
        self.adaptive || self.style != ThresholdStyle::Truncate
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        if self.inverted_enabled() {
            self.inverted = inverted;
        }
    }

    pub fn otsu(&self) -> bool {
        self.otsu
    }

    pub fn set_otsu(&mut self, otsu: bool) {
        if !self.adaptive {
            self.otsu = otsu;
        }
    }

    pub fn adaptive(&self) -> bool {
        self.adaptive
    }

    /// Switching modes resets the slider to zero and turns Otsu off.
    pub fn set_adaptive(&mut self, adaptive: bool) {
        self.adaptive = adaptive;
        if adaptive {
            self.otsu = false;
        }
        self.value = 0;
    }

    pub fn method(&self) -> AdaptiveMethod {
        self.method
    }

    pub fn set_method(&mut self, method: AdaptiveMethod) {
        self.method = method;
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn set_block_size(&mut self, size: usize) {
        let size = size.clamp(3, MAX_BLOCK_SIZE);
        self.block_size = if size % 2 == 0 { size + 1 } else { size };
    }

    fn kind(&self) -> ThresholdType {
        match (self.style, self.inverted) {
            (ThresholdStyle::Binary, false) => ThresholdType::Binary,
            (ThresholdStyle::Binary, true) => ThresholdType::BinaryInverted,
            (ThresholdStyle::Truncate, _) => ThresholdType::Truncate,
            (ThresholdStyle::ToZero, false) => ThresholdType::ToZero,
            (ThresholdStyle::ToZero, true) => ThresholdType::ToZeroInverted,
        }
    }
}

impl OperationWindow for ThresholdWindow {
    type Params = ThresholdParams;

    const KIND: OperationKind = OperationKind::Threshold;

    fn params(&self) -> ThresholdParams {
        if self.adaptive {
            ThresholdParams::Adaptive {
                method: self.method,
                block_size: self.block_size,
                offset: self.value,
                inverted: self.inverted,
            }
        } else {
            ThresholdParams::Global {
                value: self.value as f32,
                kind: self.kind(),
                otsu: self.otsu,
            }
        }
    }

    fn apply(source: &PixelBuffer, params: &ThresholdParams) -> commands::Result<PixelBuffer> {
        threshold(source, params)
    }
}
