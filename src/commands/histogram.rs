use ndarray::ArrayView2;

use crate::model::PixelBuffer;

pub const HISTOGRAM_BINS: usize = 256;

/// 256-bin intensity histogram of one plane; samples are clamped to 0..=255.
pub fn histogram(plane: ArrayView2<'_, f32>) -> Vec<u64> {
    let mut bins = vec![0_u64; HISTOGRAM_BINS];
    for value in plane.iter() {
        let bin = value.clamp(0.0, 255.0) as usize;
        bins[bin] += 1;
    }
    bins
}

pub fn channel_histogram(buffer: &PixelBuffer, channel: usize) -> Vec<u64> {
    if buffer.is_empty() || channel >= buffer.channels() {
        return vec![0; HISTOGRAM_BINS];
    }
    histogram(buffer.plane(channel))
}

/// Index of the first bin where the running count exceeds half the total.
pub fn median_from_histogram(bins: &[u64]) -> usize {
    let half = bins.iter().sum::<u64>() / 2;
    let mut accumulated = 0_u64;
    for (index, count) in bins.iter().enumerate() {
        accumulated += count;
        if accumulated > half {
            return index;
        }
    }
    0
}

pub fn channel_mean(buffer: &PixelBuffer, channel: usize) -> f64 {
    if buffer.is_empty() || channel >= buffer.channels() {
        return 0.0;
    }
    let plane = buffer.plane(channel);
    plane.iter().map(|value| f64::from(*value)).sum::<f64>() / plane.len() as f64
}

/// Empirical hysteresis bounds around a central intensity: `(2c/3, 4c/3)`.
pub fn auto_bounds(center: f64) -> (f64, f64) {
    (2.0 * center / 3.0, 4.0 * center / 3.0)
}

/// Otsu's global cut on a 256-bin histogram.
pub fn otsu_level(bins: &[u64]) -> usize {
    let total = bins.iter().sum::<u64>() as f64;
    let weighted_sum = bins
        .iter()
        .enumerate()
        .map(|(index, count)| index as f64 * *count as f64)
        .sum::<f64>();

    let mut sum_background = 0.0_f64;
    let mut weight_background = 0.0_f64;
    let mut best_variance = -1.0_f64;
    let mut best_threshold = 0usize;

    for (index, count) in bins.iter().enumerate() {
        weight_background += *count as f64;
        if weight_background == 0.0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0.0 {
            break;
        }

        sum_background += index as f64 * *count as f64;
        let mean_background = sum_background / weight_background;
        let mean_foreground = (weighted_sum - sum_background) / weight_foreground;
        let between =
            weight_background * weight_foreground * (mean_background - mean_foreground).powi(2);
        if between > best_variance {
            best_variance = between;
            best_threshold = index;
        }
    }

    best_threshold
}
