use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::model::{PixelBuffer, PixelDepth};

use super::{
    OpsError, Result,
    util::{correlate_columns, correlate_rows, derivative_kernel, min_max, separable},
};

const SCHARR_DERIVATIVE: [f32; 3] = [-1.0, 0.0, 1.0];
const SCHARR_SMOOTH: [f32; 3] = [3.0, 10.0, 3.0];
const SECOND_DERIVATIVE: [f32; 3] = [1.0, -2.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GradientMethod {
    #[default]
    Sobel,
    Scharr,
    Laplacian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientParams {
    pub method: GradientMethod,
    pub dx: u32,
    pub dy: u32,
    pub size: usize,
    pub absolute: bool,
    pub magnitude: bool,
}

/// Derivative image of the buffer's luma, min-max stretched to 8 bits.
pub fn gradient(source: &PixelBuffer, params: &GradientParams) -> Result<PixelBuffer> {
    validate(params)?;
    let plane = source.luma().mapv(|value| value / 255.0);
    let view = plane.view();

    let mut response = match params.method {
        GradientMethod::Laplacian => laplacian(view, params.size),
        _ if params.magnitude => {
            let horizontal = first_derivative(view, params.method, 1, 0, params.size);
            let vertical = first_derivative(view, params.method, 0, 1, params.size);
            let mut magnitude = horizontal.mapv(|value| value * value);
            magnitude.zip_mut_with(&vertical, |out, value| *out = (*out + value * value).sqrt());
            magnitude
        }
        method => first_derivative(view, method, params.dx, params.dy, params.size),
    };

    if params.absolute {
        response.mapv_inplace(f32::abs);
    }

    let (min, max) = min_max(response.iter().copied());
    let span = max - min;
    response.mapv_inplace(|value| {
        if span > f32::EPSILON {
            ((value - min) / span * 255.0).round()
        } else {
            0.0
        }
    });
    Ok(PixelBuffer::from_gray(response, PixelDepth::U8))
}

fn validate(params: &GradientParams) -> Result<()> {
    match params.method {
        GradientMethod::Sobel => {
            if params.dx > 2 || params.dy > 2 || params.dx + params.dy == 0 {
                return Err(OpsError::InvalidParams(format!(
                    "Sobel orders must be at most 2 and not both zero, got dx={} dy={}",
                    params.dx, params.dy
                )));
            }
            if !matches!(params.size, 3 | 5 | 7) {
                return Err(OpsError::InvalidParams(format!(
                    "Sobel aperture must be 3, 5 or 7, got {}",
                    params.size
                )));
            }
        }
        GradientMethod::Scharr => {
            if params.dx + params.dy != 1 && !params.magnitude {
                return Err(OpsError::InvalidParams(format!(
                    "Scharr needs exactly one first-order derivative, got dx={} dy={}",
                    params.dx, params.dy
                )));
            }
        }
        GradientMethod::Laplacian => {
            if params.size % 2 == 0 || params.size > 31 {
                return Err(OpsError::InvalidParams(format!(
                    "Laplacian aperture must be odd and at most 31, got {}",
                    params.size
                )));
            }
        }
    }
    Ok(())
}

fn first_derivative(
    plane: ArrayView2<'_, f32>,
    method: GradientMethod,
    dx: u32,
    dy: u32,
    size: usize,
) -> Array2<f32> {
    match method {
        GradientMethod::Scharr if dx == 1 => separable(plane, &SCHARR_DERIVATIVE, &SCHARR_SMOOTH),
        GradientMethod::Scharr => separable(plane, &SCHARR_SMOOTH, &SCHARR_DERIVATIVE),
        _ => separable(
            plane,
            &derivative_kernel(dx, size),
            &derivative_kernel(dy, size),
        ),
    }
}

fn laplacian(plane: ArrayView2<'_, f32>, size: usize) -> Array2<f32> {
    if size == 1 {
        let mut sum = correlate_rows(plane, &SECOND_DERIVATIVE);
        sum += &correlate_columns(plane, &SECOND_DERIVATIVE);
        return sum;
    }
    let mut sum = separable(plane, &derivative_kernel(2, size), &derivative_kernel(0, size));
    sum += &separable(plane, &derivative_kernel(0, size), &derivative_kernel(2, size));
    sum
}
