use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::model::PixelBuffer;

use super::{OpsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StructuringShape {
    #[default]
    Square,
    Cross,
    Disk,
    X,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MorphologyOp {
    #[default]
    Erode,
    Dilate,
    Open,
    Close,
}

impl MorphologyOp {
    /// Open and close always run a single erode/dilate pair.
    pub const fn uses_iterations(self) -> bool {
        matches!(self, Self::Erode | Self::Dilate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyParams {
    pub op: MorphologyOp,
    pub shape: StructuringShape,
    pub size: usize,
    pub iterations: usize,
}

/// `size x size` binary mask for `shape`; `size` is expected to be odd.
pub fn structuring_element(shape: StructuringShape, size: usize) -> Array2<bool> {
    let center = size.saturating_sub(1) / 2;
    Array2::from_shape_fn((size, size), |(row, col)| match shape {
        StructuringShape::Square => true,
        StructuringShape::Cross => row == center || col == center,
        StructuringShape::Disk => {
            let dy = row.abs_diff(center);
            let dx = col.abs_diff(center);
            dx * dx + dy * dy <= center * center
        }
        StructuringShape::X => row == col || row == size - 1 - col,
        StructuringShape::Custom => row == center && col == center,
    })
}

pub fn morphology(source: &PixelBuffer, params: &MorphologyParams) -> Result<PixelBuffer> {
    if params.size == 0 || params.size % 2 == 0 {
        return Err(OpsError::InvalidParams(format!(
            "structuring element size must be odd, got {}",
            params.size
        )));
    }
    let mask = structuring_element(params.shape, params.size);
    let iterations = if params.op.uses_iterations() {
        params.iterations.max(1)
    } else {
        1
    };

    let planes = source
        .planes()
        .into_iter()
        .map(|plane| match params.op {
            MorphologyOp::Erode => repeat(plane, iterations, |p| erode(p.view(), &mask)),
            MorphologyOp::Dilate => repeat(plane, iterations, |p| dilate(p.view(), &mask)),
            MorphologyOp::Open => dilate(erode(plane.view(), &mask).view(), &mask),
            MorphologyOp::Close => erode(dilate(plane.view(), &mask).view(), &mask),
        })
        .collect::<Vec<_>>();

    Ok(PixelBuffer::from_planes(&planes, source.depth())?)
}

fn repeat(
    mut plane: Array2<f32>,
    times: usize,
    step: impl Fn(&Array2<f32>) -> Array2<f32>,
) -> Array2<f32> {
    for _ in 0..times {
        plane = step(&plane);
    }
    plane
}

pub fn erode(plane: ArrayView2<'_, f32>, mask: &Array2<bool>) -> Array2<f32> {
    rank_filter(plane, mask, f32::INFINITY, f32::min)
}

pub fn dilate(plane: ArrayView2<'_, f32>, mask: &Array2<bool>) -> Array2<f32> {
    rank_filter(plane, mask, f32::NEG_INFINITY, f32::max)
}

/// Folds the masked neighbourhood of every sample; neighbours outside the
/// image do not take part.
fn rank_filter(
    plane: ArrayView2<'_, f32>,
    mask: &Array2<bool>,
    identity: f32,
    fold: fn(f32, f32) -> f32,
) -> Array2<f32> {
    let (rows, cols) = plane.dim();
    let (mask_rows, mask_cols) = mask.dim();
    let anchor_y = (mask_rows / 2) as isize;
    let anchor_x = (mask_cols / 2) as isize;
    let offsets = mask
        .indexed_iter()
        .filter(|(_, on)| **on)
        .map(|((my, mx), _)| (my as isize - anchor_y, mx as isize - anchor_x))
        .collect::<Vec<_>>();

    let mut output = Array2::<f32>::zeros((rows, cols));
    Zip::indexed(output.rows_mut()).par_for_each(|y, mut out| {
        for x in 0..cols {
            let mut value = identity;
            for (dy, dx) in &offsets {
                let sy = y as isize + dy;
                let sx = x as isize + dx;
                if sy < 0 || sx < 0 || sy >= rows as isize || sx >= cols as isize {
                    continue;
                }
                value = fold(value, plane[[sy as usize, sx as usize]]);
            }
            out[x] = if value.is_finite() {
                value
            } else {
                plane[[y, x]]
            };
        }
    });
    output
}
