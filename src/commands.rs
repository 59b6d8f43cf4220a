mod blur;
mod canny;
mod channels;
mod components;
mod error;
mod gradient;
mod histogram;
mod intensity;
mod morphology;
mod threshold;
mod util;


pub use blur::{BlurMethod, BlurParams, blur};
pub use canny::{CANNY_APERTURES, CannyParams, canny};
pub use channels::{split_hsv, split_rgb};
pub use components::{ComponentLabels, ComponentStats, connected_components};
pub use error::{OpsError, Result};
pub use gradient::{GradientMethod, GradientParams, gradient};
pub use histogram::{
    HISTOGRAM_BINS, auto_bounds, channel_histogram, channel_mean, histogram,
    median_from_histogram, otsu_level,
};
pub use intensity::{equalize, grayscale, invert, stretch};
pub use morphology::{
    MorphologyOp, MorphologyParams, StructuringShape, dilate, erode, morphology,
    structuring_element,
};
pub use threshold::{
    AdaptiveMethod, THRESHOLD_MAX_VALUE, ThresholdParams, ThresholdType, threshold,
};
