use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::model::{PixelBuffer, PixelDepth};

use super::{
    OpsError, Result,
    histogram::{histogram, otsu_level},
    util::{gaussian_kernel, separable},
};

pub const THRESHOLD_MAX_VALUE: f32 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThresholdType {
    #[default]
    Binary,
    BinaryInverted,
    Truncate,
    ToZero,
    ToZeroInverted,
}

impl ThresholdType {
    fn apply(self, value: f32, cut: f32) -> f32 {
        let above = value > cut;
        match self {
            Self::Binary if above => THRESHOLD_MAX_VALUE,
            Self::Binary => 0.0,
            Self::BinaryInverted if above => 0.0,
            Self::BinaryInverted => THRESHOLD_MAX_VALUE,
            Self::Truncate if above => cut,
            Self::ToZero if !above => 0.0,
            Self::ToZeroInverted if above => 0.0,
            _ => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AdaptiveMethod {
    #[default]
    Mean,
    Gaussian,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdParams {
    /// One cut for the whole image. With `otsu` the cut is derived from the
    /// luma histogram and `value` is ignored.
    Global {
        value: f32,
        kind: ThresholdType,
        otsu: bool,
    },
    /// Per-pixel cut: local weighted mean over `block_size` minus `offset`.
    Adaptive {
        method: AdaptiveMethod,
        block_size: usize,
        offset: i32,
        inverted: bool,
    },
}

pub fn threshold(source: &PixelBuffer, params: &ThresholdParams) -> Result<PixelBuffer> {
    match *params {
        ThresholdParams::Global { kind, otsu: true, .. } => {
            let luma = source.luma();
            let cut = otsu_level(&histogram(luma.view())) as f32;
            tracing::debug!(cut, "otsu threshold");
            Ok(PixelBuffer::from_gray(
                luma.mapv(|sample| kind.apply(sample, cut)),
                PixelDepth::U8,
            ))
        }
        ThresholdParams::Global { value, kind, .. } => {
            let planes = source
                .planes()
                .into_iter()
                .map(|plane| plane.mapv(|sample| kind.apply(sample, value)))
                .collect::<Vec<_>>();
            Ok(PixelBuffer::from_planes(&planes, source.depth())?)
        }
        ThresholdParams::Adaptive {
            method,
            block_size,
            offset,
            inverted,
        } => adaptive(source, method, block_size, offset, inverted),
    }
}

fn adaptive(
    source: &PixelBuffer,
    method: AdaptiveMethod,
    block_size: usize,
    offset: i32,
    inverted: bool,
) -> Result<PixelBuffer> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(OpsError::InvalidParams(format!(
            "adaptive block size must be odd and at least 3, got {block_size}"
        )));
    }
    let luma = source.luma();
    let kernel = match method {
        AdaptiveMethod::Mean => vec![1.0 / block_size as f32; block_size],
        AdaptiveMethod::Gaussian => gaussian_kernel(block_size, 0.0),
    };
    let local = separable(luma.view(), &kernel, &kernel);
    let (high, low) = if inverted {
        (0.0, THRESHOLD_MAX_VALUE)
    } else {
        (THRESHOLD_MAX_VALUE, 0.0)
    };

    let mut output = Array2::<f32>::zeros(luma.dim());
    Zip::from(&mut output)
        .and(&luma)
        .and(&local)
        .par_for_each(|out, sample, mean| {
            *out = if *sample > mean.round() - offset as f32 {
                high
            } else {
                low
            };
        });
    Ok(PixelBuffer::from_gray(output, PixelDepth::U8))
}
