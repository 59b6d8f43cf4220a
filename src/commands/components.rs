use std::collections::VecDeque;

use ndarray::Array2;
use serde::Serialize;

use crate::model::{PixelBuffer, PixelRect};

/// Per-label statistics. Label 0 is the background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStats {
    pub label: u32,
    pub area: usize,
    pub centroid: (f64, f64),
    pub bbox: PixelRect,
}

#[derive(Debug, Clone)]
pub struct ComponentLabels {
    pub labels: Array2<u32>,
    pub stats: Vec<ComponentStats>,
}

impl ComponentLabels {
    /// Number of foreground components.
    pub fn count(&self) -> usize {
        self.stats.len().saturating_sub(1)
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    area: usize,
    sum_x: f64,
    sum_y: f64,
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Accumulator {
    fn add(&mut self, y: usize, x: usize) {
        if self.area == 0 {
            (self.min_x, self.min_y, self.max_x, self.max_y) = (x, y, x, y);
        }
        self.area += 1;
        self.sum_x += x as f64;
        self.sum_y += y as f64;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn finish(&self, label: u32) -> ComponentStats {
        let (centroid, bbox) = if self.area == 0 {
            ((0.0, 0.0), PixelRect::new(0, 0, 0, 0))
        } else {
            (
                (self.sum_x / self.area as f64, self.sum_y / self.area as f64),
                PixelRect::new(
                    self.min_x,
                    self.min_y,
                    self.max_x - self.min_x + 1,
                    self.max_y - self.min_y + 1,
                ),
            )
        };
        ComponentStats {
            label,
            area: self.area,
            centroid,
            bbox,
        }
    }
}

/// 8-connected labelling of the non-zero luma samples, in raster order.
pub fn connected_components(source: &PixelBuffer) -> ComponentLabels {
    let luma = source.luma();
    let (rows, cols) = luma.dim();
    let mut labels = Array2::<u32>::zeros((rows, cols));
    let mut background = Accumulator::default();
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for ((y, x), value) in luma.indexed_iter() {
        if *value <= 0.0 {
            background.add(y, x);
            continue;
        }
        if labels[[y, x]] != 0 {
            continue;
        }

        let label = components.len() as u32 + 1;
        let mut accumulator = Accumulator::default();
        labels[[y, x]] = label;
        queue.push_back((y, x));

        while let Some((cy, cx)) = queue.pop_front() {
            accumulator.add(cy, cx);
            for ny in cy.saturating_sub(1)..=(cy + 1).min(rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(cols - 1) {
                    if luma[[ny, nx]] <= 0.0 || labels[[ny, nx]] != 0 {
                        continue;
                    }
                    labels[[ny, nx]] = label;
                    queue.push_back((ny, nx));
                }
            }
        }
        components.push(accumulator.finish(label));
    }

    let mut stats = Vec::with_capacity(components.len() + 1);
    stats.push(background.finish(0));
    stats.extend(components);
    ComponentLabels { labels, stats }
}
