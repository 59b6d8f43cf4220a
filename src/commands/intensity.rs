use rayon::prelude::*;

use crate::model::{PixelBuffer, PixelDepth};

use super::{
    Result,
    histogram::{HISTOGRAM_BINS, histogram},
    util::min_max,
};

/// `255 - v` on every sample.
pub fn invert(source: &PixelBuffer) -> Result<PixelBuffer> {
    let planes = source
        .planes()
        .into_par_iter()
        .map(|plane| plane.mapv(|value| 255.0 - value))
        .collect::<Vec<_>>();
    Ok(PixelBuffer::from_planes(&planes, source.depth())?.saturate_u8())
}

pub fn grayscale(source: &PixelBuffer) -> Result<PixelBuffer> {
    Ok(source.to_gray().saturate_u8())
}

/// Histogram equalization, one lookup table per channel.
pub fn equalize(source: &PixelBuffer) -> Result<PixelBuffer> {
    let planes = source
        .clone()
        .saturate_u8()
        .planes()
        .into_par_iter()
        .map(|plane| {
            let lut = equalization_table(&histogram(plane.view()));
            plane.mapv(|value| lut[value as usize])
        })
        .collect::<Vec<_>>();
    Ok(PixelBuffer::from_planes(&planes, PixelDepth::U8)?)
}

fn equalization_table(bins: &[u64]) -> Vec<f32> {
    let mut lut = vec![0.0_f32; HISTOGRAM_BINS];
    let total = bins.iter().sum::<u64>();
    let Some(first) = bins.iter().position(|count| *count > 0) else {
        return lut;
    };
    if bins[first] == total {
        lut.fill(first as f32);
        return lut;
    }
    let scale = 255.0 / (total - bins[first]) as f64;
    let mut accumulated = 0_u64;
    for index in first + 1..HISTOGRAM_BINS {
        accumulated += bins[index];
        lut[index] = (accumulated as f64 * scale).round().clamp(0.0, 255.0) as f32;
    }
    lut
}

/// Min-max stretch over all channels into `0..=255`.
pub fn stretch(source: &PixelBuffer) -> Result<PixelBuffer> {
    let (min, max) = min_max(source.data().iter().copied());
    let span = max - min;
    let planes = source
        .planes()
        .into_iter()
        .map(|plane| {
            plane.mapv(|value| {
                if span > f32::EPSILON {
                    (value - min) / span * 255.0
                } else {
                    0.0
                }
            })
        })
        .collect::<Vec<_>>();
    Ok(PixelBuffer::from_planes(&planes, source.depth())?.saturate_u8())
}
