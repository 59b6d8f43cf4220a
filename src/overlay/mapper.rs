use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
struct MappingKey {
    image: [usize; 2],
    label: Vec2,
    fit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Mapping {
    scale: f32,
    offset: Vec2,
}

/// Converts between label (widget-local) coordinates and image pixels.
///
/// With fit-to-screen the image is scaled uniformly to the label and
/// centered; otherwise it is drawn 1:1 and centered only when it is smaller
/// than the label in both directions. The mapping is recomputed only when
/// the image size, label size or fit flag changes.
#[derive(Debug, Clone, Default)]
pub struct DisplayMapper {
    fit: bool,
    key: Option<MappingKey>,
    mapping: Option<Mapping>,
    revision: u64,
}

impl DisplayMapper {
    pub fn new(fit: bool) -> Self {
        Self {
            fit,
            ..Self::default()
        }
    }

    pub fn fit(&self) -> bool {
        self.fit
    }

    pub fn set_fit(&mut self, fit: bool) {
        if self.fit != fit {
            self.fit = fit;
            self.refresh();
        }
    }

    /// Number of times the mapping has been rebuilt.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Records the current image and label sizes, rebuilding the mapping
    /// when either changed.
    pub fn sync(&mut self, image_width: usize, image_height: usize, label: Vec2) {
        let key = MappingKey {
            image: [image_width, image_height],
            label,
            fit: self.fit,
        };
        if self.key != Some(key) {
            self.key = Some(key);
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let Some(key) = self.key.as_mut() else {
            return;
        };
        key.fit = self.fit;
        self.mapping = compute(*key);
        self.revision += 1;
    }

    fn image_size(&self) -> Option<Vec2> {
        let key = self.key?;
        Some(vec2(key.image[0] as f32, key.image[1] as f32))
    }

    pub fn scale(&self) -> f32 {
        self.mapping.map_or(1.0, |mapping| mapping.scale)
    }

    /// Where the image is drawn, in label coordinates.
    pub fn display_rect(&self) -> Option<Rect> {
        let mapping = self.mapping?;
        let size = self.image_size()? * mapping.scale;
        Some(Rect::from_min_size(Pos2::ZERO + mapping.offset, size))
    }

    pub fn display_size(&self) -> Option<Vec2> {
        self.display_rect().map(|rect| rect.size())
    }

    pub fn image_to_label(&self, image: Pos2) -> Option<Pos2> {
        let mapping = self.mapping?;
        Some(pos2(image.x * mapping.scale, image.y * mapping.scale) + mapping.offset)
    }

    /// Image coordinates under a label position, or `None` outside the image.
    pub fn label_to_image(&self, label: Pos2) -> Option<Pos2> {
        let mapping = self.mapping?;
        let size = self.image_size()?;
        let local = (label.to_vec2() - mapping.offset) / mapping.scale;
        let image = pos2(local.x, local.y);
        let inside = image.x >= 0.0 && image.y >= 0.0 && image.x < size.x && image.y < size.y;
        inside.then_some(image)
    }

    /// Integer pixel under the cursor for the hover readout.
    pub fn hover_pixel(&self, label: Pos2) -> Option<(usize, usize)> {
        let image = self.label_to_image(label)?;
        Some((image.x.floor() as usize, image.y.floor() as usize))
    }

    /// Clamps a label position onto the drawn image, then maps it.
    pub fn clamp_to_image(&self, label: Pos2) -> Option<Pos2> {
        let mapping = self.mapping?;
        let size = self.image_size()?;
        let local = (label.to_vec2() - mapping.offset) / mapping.scale;
        Some(pos2(local.x.clamp(0.0, size.x), local.y.clamp(0.0, size.y)))
    }
}

fn compute(key: MappingKey) -> Option<Mapping> {
    let [width, height] = key.image;
    if width == 0 || height == 0 {
        return None;
    }
    let image = vec2(width as f32, height as f32);
    let label = key.label;

    if key.fit {
        if label.x <= 0.0 || label.y <= 0.0 {
            return None;
        }
        let scale = (label.x / image.x).min(label.y / image.y);
        let offset = (label - image * scale) / 2.0;
        return Some(Mapping { scale, offset });
    }

    let offset = if image.x < label.x && image.y < label.y {
        ((label - image) / 2.0).floor()
    } else {
        Vec2::ZERO
    };
    Some(Mapping { scale: 1.0, offset })
}
