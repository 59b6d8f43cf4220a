use crate::commands::{self, GradientMethod, GradientParams, gradient};
use crate::model::PixelBuffer;

use super::{OperationKind, OperationWindow};

pub const MAX_LAPLACIAN_SIZE: usize = 31;
pub const MAX_SOBEL_SIZE: usize = 7;

/// Keeps the derivative orders and aperture consistent with the selected
/// operator: Sobel takes orders up to 2 (never both zero), Scharr exactly
/// one first-order derivative at aperture 3, Laplacian no orders at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientWindow {
    method: GradientMethod,
    dx: u32,
    dy: u32,
    size: usize,
    absolute: bool,
    magnitude: bool,
}

impl Default for GradientWindow {
    fn default() -> Self {
        Self {
            method: GradientMethod::Sobel,
            dx: 1,
            dy: 0,
            size: 3,
            absolute: false,
            magnitude: false,
        }
    }
}

impl GradientWindow {
    pub fn method(&self) -> GradientMethod {
        self.method
    }

    pub fn dx(&self) -> u32 {
        self.dx
    }

    pub fn dy(&self) -> u32 {
        self.dy
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn absolute(&self) -> bool {
        self.absolute
    }

    pub fn magnitude(&self) -> bool {
        self.magnitude
    }

    /// Order spin boxes are inactive for Laplacian and magnitude output.
    pub fn orders_enabled(&self) -> bool {
        self.method != GradientMethod::Laplacian && !self.magnitude
    }

    pub fn size_enabled(&self) -> bool {
        self.method != GradientMethod::Scharr
    }

    pub fn magnitude_enabled(&self) -> bool {
        self.method != GradientMethod::Laplacian
    }

    pub fn absolute_enabled(&self) -> bool {
        !self.magnitude
    }

    pub fn max_order(&self) -> u32 {
        match self.method {
            GradientMethod::Sobel => 2,
            GradientMethod::Scharr => 1,
            GradientMethod::Laplacian => 0,
        }
    }

    pub fn set_method(&mut self, method: GradientMethod) {
        self.method = method;
        match method {
            GradientMethod::Laplacian => self.magnitude = false,
            GradientMethod::Scharr => {
                self.size = 3;
                self.dx = 1;
                self.dy = 0;
            }
            GradientMethod::Sobel => {}
        }
        self.size = self.clamp_size(self.size);
    }

    pub fn set_dx(&mut self, dx: u32) {
        if !self.orders_enabled() {
            return;
        }
        self.dx = dx.min(self.max_order());
        match self.method {
            GradientMethod::Scharr => self.dy = 1 - self.dx,
            _ if self.dx == 0 => self.dy = self.dy.max(1),
            _ => {}
        }
    }

    pub fn set_dy(&mut self, dy: u32) {
        if !self.orders_enabled() {
            return;
        }
        self.dy = dy.min(self.max_order());
        match self.method {
            GradientMethod::Scharr => self.dx = 1 - self.dy,
            _ if self.dy == 0 => self.dx = self.dx.max(1),
            _ => {}
        }
    }

    pub fn set_size(&mut self, size: usize) {
        if self.size_enabled() {
            self.size = self.clamp_size(size);
        }
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        if self.absolute_enabled() {
            self.absolute = absolute;
        }
    }

    pub fn set_magnitude(&mut self, magnitude: bool) {
        if !self.magnitude_enabled() {
            return;
        }
        self.magnitude = magnitude;
        if magnitude {
            self.absolute = false;
        }
    }

    fn clamp_size(&self, size: usize) -> usize {
        let (min, max) = match self.method {
            GradientMethod::Laplacian => (1, MAX_LAPLACIAN_SIZE),
            GradientMethod::Sobel => (3, MAX_SOBEL_SIZE),
            GradientMethod::Scharr => (3, 3),
        };
        let size = size.clamp(min, max);
        if size % 2 == 0 { size + 1 } else { size }
    }
}

impl OperationWindow for GradientWindow {
    type Params = GradientParams;

    const KIND: OperationKind = OperationKind::Gradient;

    fn params(&self) -> GradientParams {
        GradientParams {
            method: self.method,
            dx: self.dx,
            dy: self.dy,
            size: self.size,
            absolute: self.absolute,
            magnitude: self.magnitude,
        }
    }

    fn apply(source: &PixelBuffer, params: &GradientParams) -> commands::Result<PixelBuffer> {
        gradient(source, params)
    }
}
