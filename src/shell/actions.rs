use crate::commands::{self, equalize, grayscale, invert, split_hsv, split_rgb, stretch};
use crate::measure::MeasureMode;
use crate::model::PixelBuffer;
use crate::windows::OperationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    Idle,
    Operation(OperationKind),
    Measurement(MeasureMode),
}

impl ShellMode {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// One-shot edits applied directly to the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Grayscale,
    Invert,
    Equalize,
    Stretch,
}

impl Adjustment {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::Equalize => "equalize",
            Self::Stretch => "stretch",
        }
    }

    pub fn apply(self, source: &PixelBuffer) -> commands::Result<PixelBuffer> {
        match self {
            Self::Grayscale => grayscale(source),
            Self::Invert => invert(source),
            Self::Equalize => equalize(source),
            Self::Stretch => stretch(source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSplit {
    Rgb,
    Hsv,
}

impl ChannelSplit {
    pub const fn suffixes(self) -> [&'static str; 3] {
        match self {
            Self::Rgb => ["R", "G", "B"],
            Self::Hsv => ["H", "S", "V"],
        }
    }

    pub fn apply(self, source: &PixelBuffer) -> commands::Result<Vec<PixelBuffer>> {
        match self {
            Self::Rgb => split_rgb(source),
            Self::Hsv => split_hsv(source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    Revert,
    Undo,
    Close,
    Crop,
    Grayscale,
    Invert,
    Equalize,
    Stretch,
    Histogram,
    SplitRgb,
    SplitHsv,
    Blur,
    Canny,
    Gradient,
    Morphology,
    Threshold,
    SetScale,
    Distance,
    Particles,
    ClearOverlay,
    About,
}

impl MenuAction {
    pub const FILE: [Self; 5] = [Self::Open, Self::Save, Self::Revert, Self::Undo, Self::Close];
    pub const IMAGE: [Self; 8] = [
        Self::Crop,
        Self::Grayscale,
        Self::Invert,
        Self::Equalize,
        Self::Stretch,
        Self::Histogram,
        Self::SplitRgb,
        Self::SplitHsv,
    ];
    pub const PROCESS: [Self; 5] = [
        Self::Blur,
        Self::Canny,
        Self::Gradient,
        Self::Morphology,
        Self::Threshold,
    ];
    pub const ANALYZE: [Self; 4] = [
        Self::SetScale,
        Self::Distance,
        Self::Particles,
        Self::ClearOverlay,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open...",
            Self::Save => "Save...",
            Self::Revert => "Revert",
            Self::Undo => "Undo",
            Self::Close => "Close",
            Self::Crop => "Crop",
            Self::Grayscale => "Grayscale",
            Self::Invert => "Invert",
            Self::Equalize => "Equalize",
            Self::Stretch => "Stretch",
            Self::Histogram => "Histogram",
            Self::SplitRgb => "Split RGB",
            Self::SplitHsv => "Split HSV",
            Self::Blur => "Blur...",
            Self::Canny => "Canny...",
            Self::Gradient => "Gradient...",
            Self::Morphology => "Morphology...",
            Self::Threshold => "Threshold...",
            Self::SetScale => "Set Scale...",
            Self::Distance => "Distance",
            Self::Particles => "Particles",
            Self::ClearOverlay => "Clear Overlay",
            Self::About => "About",
        }
    }

    pub const fn operation(self) -> Option<OperationKind> {
        match self {
            Self::Blur => Some(OperationKind::Blur),
            Self::Canny => Some(OperationKind::Canny),
            Self::Gradient => Some(OperationKind::Gradient),
            Self::Morphology => Some(OperationKind::Morphology),
            Self::Threshold => Some(OperationKind::Threshold),
            _ => None,
        }
    }

    pub const fn measurement(self) -> Option<MeasureMode> {
        match self {
            Self::SetScale => Some(MeasureMode::Scale),
            Self::Distance => Some(MeasureMode::Distance),
            Self::Crop => Some(MeasureMode::Crop),
            _ => None,
        }
    }

    pub const fn adjustment(self) -> Option<Adjustment> {
        match self {
            Self::Grayscale => Some(Adjustment::Grayscale),
            Self::Invert => Some(Adjustment::Invert),
            Self::Equalize => Some(Adjustment::Equalize),
            Self::Stretch => Some(Adjustment::Stretch),
            _ => None,
        }
    }

    /// While an operation or measurement is active only About stays
    /// available. When idle, actions that read pixels need a loaded image.
    pub fn is_enabled(self, mode: ShellMode, has_image: bool) -> bool {
        match self {
            Self::About => true,
            _ if !mode.is_idle() => false,
            Self::Open | Self::Close => true,
            _ => has_image,
        }
    }
}
