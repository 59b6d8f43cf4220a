use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::model::PixelBuffer;

use super::{
    OpsError, Result,
    util::{gaussian_kernel, separable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlurMethod {
    #[default]
    Average,
    Gaussian,
    Median,
}

impl BlurMethod {
    /// Gaussian and median apertures must be odd.
    pub const fn requires_odd_size(self) -> bool {
        matches!(self, Self::Gaussian | Self::Median)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurParams {
    pub method: BlurMethod,
    pub size: usize,
}

/// Smooths every channel with a `size x size` box, Gaussian or median window.
pub fn blur(source: &PixelBuffer, params: &BlurParams) -> Result<PixelBuffer> {
    if params.size == 0 {
        return Err(OpsError::InvalidParams("blur size must be positive".into()));
    }
    if params.method.requires_odd_size() && params.size % 2 == 0 {
        return Err(OpsError::InvalidParams(format!(
            "{:?} blur needs an odd size, got {}",
            params.method, params.size
        )));
    }

    let planes = source
        .planes()
        .iter()
        .map(|plane| match params.method {
            BlurMethod::Average => {
                let kernel = vec![1.0 / params.size as f32; params.size];
                separable(plane.view(), &kernel, &kernel)
            }
            BlurMethod::Gaussian => {
                let kernel = gaussian_kernel(params.size, 0.0);
                separable(plane.view(), &kernel, &kernel)
            }
            BlurMethod::Median => median(plane.view(), params.size),
        })
        .collect::<Vec<_>>();

    Ok(PixelBuffer::from_planes(&planes, source.depth())?.saturate_u8())
}

fn median(plane: ArrayView2<'_, f32>, size: usize) -> Array2<f32> {
    let (rows, cols) = plane.dim();
    let radius = (size / 2) as isize;
    let mut output = Array2::<f32>::zeros((rows, cols));
    Zip::indexed(output.rows_mut()).par_for_each(|y, mut out| {
        let mut window = Vec::with_capacity(size * size);
        for x in 0..cols {
            window.clear();
            for dy in -radius..=radius {
                let sy = (y as isize + dy).clamp(0, rows as isize - 1) as usize;
                for dx in -radius..=radius {
                    let sx = (x as isize + dx).clamp(0, cols as isize - 1) as usize;
                    window.push(plane[[sy, sx]]);
                }
            }
            let middle = window.len() / 2;
            let (_, value, _) = window.select_nth_unstable_by(middle, f32::total_cmp);
            out[x] = *value;
        }
    });
    output
}
