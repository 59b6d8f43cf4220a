use ndarray::Array2;

use crate::commands::{
    self, MorphologyOp, MorphologyParams, StructuringShape, morphology, structuring_element,
};
use crate::model::PixelBuffer;

use super::{OperationKind, OperationWindow};

pub const MAX_ELEMENT_SIZE: usize = 51;
pub const MAX_ITERATIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphologyWindow {
    op: MorphologyOp,
    shape: StructuringShape,
    size: usize,
    iterations: usize,
}

impl Default for MorphologyWindow {
    fn default() -> Self {
        Self {
            op: MorphologyOp::Erode,
            shape: StructuringShape::Square,
            size: 3,
            iterations: 1,
        }
    }
}

impl MorphologyWindow {
    pub fn op(&self) -> MorphologyOp {
        self.op
    }

    pub fn shape(&self) -> StructuringShape {
        self.shape
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn iterations_enabled(&self) -> bool {
        self.op.uses_iterations()
    }

    /// Open and close pin the iteration count to one.
    pub fn set_op(&mut self, op: MorphologyOp) {
        self.op = op;
        if !op.uses_iterations() {
            self.iterations = 1;
        }
    }

    pub fn set_shape(&mut self, shape: StructuringShape) {
        self.shape = shape;
    }

    pub fn set_size(&mut self, size: usize) {
        let size = size.clamp(1, MAX_ELEMENT_SIZE);
        self.size = if size % 2 == 0 { size + 1 } else { size };
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        if self.iterations_enabled() {
            self.iterations = iterations.clamp(1, MAX_ITERATIONS);
        }
    }

    /// Mask shown next to the controls.
    pub fn element(&self) -> Array2<bool> {
        structuring_element(self.shape, self.size)
    }
}

impl OperationWindow for MorphologyWindow {
    type Params = MorphologyParams;

    const KIND: OperationKind = OperationKind::Morphology;

    fn params(&self) -> MorphologyParams {
        MorphologyParams {
            op: self.op,
            shape: self.shape,
            size: self.size,
            iterations: self.iterations,
        }
    }

    fn apply(source: &PixelBuffer, params: &MorphologyParams) -> commands::Result<PixelBuffer> {
        morphology(source, params)
    }
}
