use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::model::{PixelBuffer, PixelDepth};

use super::{
    OpsError, Result,
    util::{derivative_kernel, separable},
};

pub const CANNY_APERTURES: [usize; 3] = [3, 5, 7];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannyParams {
    pub low: f64,
    pub high: f64,
    pub aperture: usize,
    pub l2_gradient: bool,
}

/// Canny edge map of the buffer's luma: 255 on edges, 0 elsewhere.
pub fn canny(source: &PixelBuffer, params: &CannyParams) -> Result<PixelBuffer> {
    if !CANNY_APERTURES.contains(&params.aperture) {
        return Err(OpsError::InvalidParams(format!(
            "Canny aperture must be 3, 5 or 7, got {}",
            params.aperture
        )));
    }
    let (low, high) = if params.low > params.high {
        (params.high, params.low)
    } else {
        (params.low, params.high)
    };

    let luma = source.luma();
    let (rows, cols) = luma.dim();
    let smooth = derivative_kernel(0, params.aperture);
    let derivative = derivative_kernel(1, params.aperture);
    let gx = separable(luma.view(), &derivative, &smooth);
    let gy = separable(luma.view(), &smooth, &derivative);

    let mut magnitude = Array2::<f32>::zeros((rows, cols));
    Zip::from(&mut magnitude)
        .and(&gx)
        .and(&gy)
        .par_for_each(|out, dx, dy| {
            *out = if params.l2_gradient {
                (dx * dx + dy * dy).sqrt()
            } else {
                dx.abs() + dy.abs()
            };
        });

    let suppressed = non_maximum_suppression(&magnitude, &gx, &gy);
    let edges = hysteresis(&suppressed, low as f32, high as f32);
    Ok(PixelBuffer::from_gray(edges, PixelDepth::U8))
}

fn non_maximum_suppression(magnitude: &Array2<f32>, gx: &Array2<f32>, gy: &Array2<f32>) -> Array2<f32> {
    let (rows, cols) = magnitude.dim();
    let mut output = Array2::<f32>::zeros((rows, cols));
    if rows < 3 || cols < 3 {
        return output;
    }
    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        if y == 0 || x == 0 || y + 1 == rows || x + 1 == cols {
            return;
        }
        let value = magnitude[[y, x]];
        if value <= 0.0 {
            return;
        }
        let angle = gy[[y, x]].atan2(gx[[y, x]]).to_degrees().rem_euclid(180.0);
        let (a, b) = if !(22.5..157.5).contains(&angle) {
            (magnitude[[y, x - 1]], magnitude[[y, x + 1]])
        } else if angle < 67.5 {
            (magnitude[[y - 1, x - 1]], magnitude[[y + 1, x + 1]])
        } else if angle < 112.5 {
            (magnitude[[y - 1, x]], magnitude[[y + 1, x]])
        } else {
            (magnitude[[y - 1, x + 1]], magnitude[[y + 1, x - 1]])
        };
        if value > a && value >= b {
            *out = value;
        }
    });
    output
}

fn hysteresis(suppressed: &Array2<f32>, low: f32, high: f32) -> Array2<f32> {
    let (rows, cols) = suppressed.dim();
    let mut edges = Array2::<f32>::zeros((rows, cols));
    let mut stack = Vec::new();

    for ((y, x), value) in suppressed.indexed_iter() {
        if *value <= high || edges[[y, x]] > 0.0 {
            continue;
        }
        edges[[y, x]] = 255.0;
        stack.push((y, x));
        while let Some((cy, cx)) = stack.pop() {
            for ny in cy.saturating_sub(1)..=(cy + 1).min(rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(cols - 1) {
                    if edges[[ny, nx]] == 0.0 && suppressed[[ny, nx]] > low {
                        edges[[ny, nx]] = 255.0;
                        stack.push((ny, nx));
                    }
                }
            }
        }
    }
    edges
}
