mod blur;
mod canny;
mod gradient;
mod morphology;
mod threshold;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::commands;
use crate::model::PixelBuffer;
use crate::session::{DocumentEvent, EditSession};

pub use blur::{BlurWindow, MAX_BLUR_SIZE};
pub use canny::{CANNY_SLIDER_MAX, CannyThresholdMode, CannyWindow};
pub use gradient::{GradientWindow, MAX_LAPLACIAN_SIZE, MAX_SOBEL_SIZE};
pub use morphology::{MAX_ELEMENT_SIZE, MAX_ITERATIONS, MorphologyWindow};
pub use threshold::{MAX_BLOCK_SIZE, ThresholdStyle, ThresholdWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Blur,
    Canny,
    Gradient,
    Morphology,
    Threshold,
}

impl OperationKind {
    pub const ALL: [Self; 5] = [
        Self::Blur,
        Self::Canny,
        Self::Gradient,
        Self::Morphology,
        Self::Threshold,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Canny => "canny",
            Self::Gradient => "gradient",
            Self::Morphology => "morphology",
            Self::Threshold => "threshold",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Blur => "Blur",
            Self::Canny => "Canny",
            Self::Gradient => "Gradient",
            Self::Morphology => "Morphology",
            Self::Threshold => "Threshold",
        }
    }
}

/// Widget state for one operation. Setters clamp every value to what the
/// transform accepts, so [`OperationWindow::params`] is always valid.
pub trait OperationWindow {
    type Params: Debug;

    const KIND: OperationKind;

    fn params(&self) -> Self::Params;

    fn apply(source: &PixelBuffer, params: &Self::Params) -> commands::Result<PixelBuffer>;

    fn preview(&self, session: &mut EditSession) -> commands::Result<DocumentEvent> {
        session.recompute(Self::apply, &self.params())
    }
}

/// The window driving the current edit session.
#[derive(Debug, Clone)]
pub enum ActiveWindow {
    Blur(BlurWindow),
    Canny(CannyWindow),
    Gradient(GradientWindow),
    Morphology(MorphologyWindow),
    Threshold(ThresholdWindow),
}

impl ActiveWindow {
    /// Default widget state for `kind`; `source` seeds data-dependent
    /// defaults such as automatic Canny bounds and the threshold histogram.
    pub fn open(kind: OperationKind, source: &PixelBuffer) -> Self {
        match kind {
            OperationKind::Blur => Self::Blur(BlurWindow::default()),
            OperationKind::Canny => Self::Canny(CannyWindow::new(source)),
            OperationKind::Gradient => Self::Gradient(GradientWindow::default()),
            OperationKind::Morphology => Self::Morphology(MorphologyWindow::default()),
            OperationKind::Threshold => Self::Threshold(ThresholdWindow::new(source)),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Blur(_) => BlurWindow::KIND,
            Self::Canny(_) => CannyWindow::KIND,
            Self::Gradient(_) => GradientWindow::KIND,
            Self::Morphology(_) => MorphologyWindow::KIND,
            Self::Threshold(_) => ThresholdWindow::KIND,
        }
    }

    pub fn preview(&self, session: &mut EditSession) -> commands::Result<DocumentEvent> {
        match self {
            Self::Blur(window) => window.preview(session),
            Self::Canny(window) => window.preview(session),
            Self::Gradient(window) => window.preview(session),
            Self::Morphology(window) => window.preview(session),
            Self::Threshold(window) => window.preview(session),
        }
    }
}
