use crate::commands::{self, BlurMethod, BlurParams, blur};
use crate::model::PixelBuffer;

use super::{OperationKind, OperationWindow};

pub const MAX_BLUR_SIZE: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurWindow {
    method: BlurMethod,
    size: usize,
}

impl Default for BlurWindow {
    fn default() -> Self {
        Self {
            method: BlurMethod::Average,
            size: 3,
        }
    }
}

impl BlurWindow {
    pub fn method(&self) -> BlurMethod {
        self.method
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set_method(&mut self, method: BlurMethod) {
        self.method = method;
        self.size = self.clamp_size(self.size);
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = self.clamp_size(size);
    }

    fn clamp_size(&self, size: usize) -> usize {
        let size = size.clamp(1, MAX_BLUR_SIZE);
        if self.method.requires_odd_size() && size % 2 == 0 {
            size + 1
        } else {
            size
        }
    }
}

impl OperationWindow for BlurWindow {
    type Params = BlurParams;

    const KIND: OperationKind = OperationKind::Blur;

    fn params(&self) -> BlurParams {
        BlurParams {
            method: self.method,
            size: self.size,
        }
    }

    fn apply(source: &PixelBuffer, params: &BlurParams) -> commands::Result<PixelBuffer> {
        blur(source, params)
    }
}
