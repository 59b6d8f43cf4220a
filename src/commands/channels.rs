use ndarray::{Array2, Zip};

use crate::model::{PixelBuffer, PixelDepth};

use super::{OpsError, Result};

/// One gray buffer per channel, in red, green, blue order.
pub fn split_rgb(source: &PixelBuffer) -> Result<Vec<PixelBuffer>> {
    require_color(source)?;
    Ok(source
        .planes()
        .into_iter()
        .map(|plane| PixelBuffer::from_gray(plane, source.depth()))
        .collect())
}

/// Hue, saturation and value planes in the 8-bit convention: hue is halved
/// into `0..180`, saturation and value span `0..=255`.
pub fn split_hsv(source: &PixelBuffer) -> Result<Vec<PixelBuffer>> {
    require_color(source)?;
    let dim = (source.rows(), source.cols());
    let mut hue = Array2::<f32>::zeros(dim);
    let mut saturation = Array2::<f32>::zeros(dim);
    let mut value = Array2::<f32>::zeros(dim);

    Zip::from(&mut hue)
        .and(&mut saturation)
        .and(&mut value)
        .and(source.plane(0))
        .and(source.plane(1))
        .and(source.plane(2))
        .par_for_each(|h, s, v, r, g, b| {
            let (hh, ss, vv) = hsv_pixel(*r, *g, *b);
            *h = hh;
            *s = ss;
            *v = vv;
        });

    Ok([hue, saturation, value]
        .into_iter()
        .map(|plane| PixelBuffer::from_gray(plane, PixelDepth::U8).saturate_u8())
        .collect())
}

fn hsv_pixel(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    if delta <= 0.0 {
        return (0.0, saturation, max);
    }
    let mut degrees = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }
    ((degrees / 2.0).round() % 180.0, saturation, max)
}

fn require_color(source: &PixelBuffer) -> Result<()> {
    if source.channels() != 3 {
        return Err(OpsError::UnsupportedLayout(format!(
            "channel split needs a 3-channel image, got {}",
            source.channels()
        )));
    }
    Ok(())
}
