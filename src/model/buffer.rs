use ndarray::{Array2, Array3, ArrayView2, Axis, s};
use serde::{Deserialize, Serialize};

use super::{CoreError, Result};

/// Sample depth of a [`PixelBuffer`].
///
/// Samples are always held as `f32`; the depth records the range they came
/// from and the range operations are expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PixelDepth {
    #[default]
    U8,
    F32,
}

impl PixelDepth {
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::F32 => 32,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::U8 => "8 bits",
            Self::F32 => "32 bits",
        }
    }
}

/// Axis-aligned rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the rectangle spanned by two corner points, or `None` when the
    /// span is degenerate in either direction.
    ///
    /// Each corner snaps to its nearest pixel edge, so corners that lie on
    /// the image keep the rectangle on the image.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Option<Self> {
        let edge = |value: f32| value.max(0.0).round() as usize;
        let (left, right) = (edge(a.0.min(b.0)), edge(a.0.max(b.0)));
        let (top, bottom) = (edge(a.1.min(b.1)), edge(a.1.max(b.1)));
        let rect = Self::new(left, top, right - left, bottom - top);
        (!rect.is_empty()).then_some(rect)
    }

    /// Intersection with a `cols x rows` buffer, `None` when nothing is left.
    pub fn clamped(&self, cols: usize, rows: usize) -> Option<Self> {
        let right = self.right().min(cols);
        let bottom = self.bottom().min(rows);
        let rect = Self::new(
            self.x.min(right),
            self.y.min(bottom),
            right.saturating_sub(self.x),
            bottom.saturating_sub(self.y),
        );
        (!rect.is_empty()).then_some(rect)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }
}

/// Owned raster of `rows x cols x channels` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Array3<f32>,
    depth: PixelDepth,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl PixelBuffer {
    pub fn new(data: Array3<f32>, depth: PixelDepth) -> Result<Self> {
        let channels = data.shape()[2];
        if !data.is_empty() && channels != 1 && channels != 3 {
            return Err(CoreError::UnsupportedChannels(channels));
        }
        Ok(Self { data, depth })
    }

    pub fn empty() -> Self {
        Self {
            data: Array3::zeros((0, 0, 1)),
            depth: PixelDepth::U8,
        }
    }

    pub fn filled(rows: usize, cols: usize, channels: usize, value: f32) -> Result<Self> {
        Self::new(Array3::from_elem((rows, cols, channels), value), PixelDepth::U8)
    }

    pub fn from_samples(
        rows: usize,
        cols: usize,
        channels: usize,
        samples: Vec<f32>,
        depth: PixelDepth,
    ) -> Result<Self> {
        if samples.len() != rows * cols * channels {
            return Err(CoreError::SampleCount {
                rows,
                cols,
                channels,
                actual: samples.len(),
            });
        }
        let data = Array3::from_shape_vec((rows, cols, channels), samples)?;
        Self::new(data, depth)
    }

    pub fn from_gray(plane: Array2<f32>, depth: PixelDepth) -> Self {
        let data = plane.insert_axis(Axis(2));
        Self { data, depth }
    }

    pub fn from_planes(planes: &[Array2<f32>], depth: PixelDepth) -> Result<Self> {
        let views = planes.iter().map(Array2::view).collect::<Vec<_>>();
        let data = ndarray::stack(Axis(2), &views)?;
        Self::new(data, depth)
    }

    pub fn rows(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn cols(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn channels(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn plane(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(2), channel)
    }

    pub fn planes(&self) -> Vec<Array2<f32>> {
        (0..self.channels())
            .map(|channel| self.plane(channel).to_owned())
            .collect()
    }

    pub fn sample(&self, row: usize, col: usize, channel: usize) -> Option<f32> {
        self.data.get((row, col, channel)).copied()
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<Vec<f32>> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        Some(self.data.slice(s![row, col, ..]).to_vec())
    }

    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        }))
    }

    /// Copies the sub-region covered by `rect` into a new buffer.
    pub fn crop(&self, rect: PixelRect) -> Result<Self> {
        if rect.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        if rect.right() > self.cols() || rect.bottom() > self.rows() {
            return Err(CoreError::CropOutOfBounds {
                rect,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        let view = self
            .data
            .slice(s![rect.y..rect.bottom(), rect.x..rect.right(), ..]);
        Ok(Self {
            data: view.to_owned(),
            depth: self.depth,
        })
    }

    /// Weighted luma plane (`0.299 R + 0.587 G + 0.114 B`); gray buffers are
    /// returned unchanged.
    pub fn luma(&self) -> Array2<f32> {
        if self.channels() == 1 {
            return self.plane(0).to_owned();
        }
        let red = self.plane(0);
        let green = self.plane(1);
        let blue = self.plane(2);
        let mut luma = Array2::zeros((self.rows(), self.cols()));
        ndarray::Zip::from(&mut luma)
            .and(&red)
            .and(&green)
            .and(&blue)
            .for_each(|out, r, g, b| {
                *out = 0.299 * r + 0.587 * g + 0.114 * b;
            });
        if self.depth == PixelDepth::U8 {
            luma.mapv_inplace(|value| value.round().clamp(0.0, 255.0));
        }
        luma
    }

    pub fn to_gray(&self) -> Self {
        Self::from_gray(self.luma(), self.depth)
    }

    /// Rounds and clamps every sample into the 8-bit range.
    pub fn saturate_u8(mut self) -> Self {
        self.data
            .mapv_inplace(|value| value.round().clamp(0.0, 255.0));
        self.depth = PixelDepth::U8;
        self
    }

    pub fn to_u8_samples(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|value| value.round().clamp(0.0, 255.0) as u8)
            .collect()
    }
}
