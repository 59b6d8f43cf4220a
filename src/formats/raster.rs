use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::model::{PixelBuffer, PixelDepth};

use super::{IoError, Result};

/// Decodes a raster file: gray images keep one channel, everything else
/// becomes 8-bit RGB.
pub(crate) fn read_raster(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)?;
    let (width, height) = (image.width() as usize, image.height() as usize);
    let (channels, bytes) = if image.color().has_color() {
        (3, image.to_rgb8().into_raw())
    } else {
        (1, image.to_luma8().into_raw())
    };
    let samples = bytes.into_iter().map(f32::from).collect::<Vec<_>>();
    Ok(PixelBuffer::from_samples(
        height,
        width,
        channels,
        samples,
        PixelDepth::U8,
    )?)
}

pub(crate) fn write_jpeg(path: &Path, buffer: &PixelBuffer, quality: u8) -> Result<()> {
    if buffer.is_empty() {
        return Err(IoError::EmptyBuffer);
    }
    let color = match buffer.channels() {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        other => {
            return Err(IoError::UnsupportedLayout(format!(
                "JPEG needs 1 or 3 channels, found {other}"
            )));
        }
    };
    let bytes = buffer.to_u8_samples();
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.encode(&bytes, buffer.cols() as u32, buffer.rows() as u32, color)?;
    Ok(())
}
