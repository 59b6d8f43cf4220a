mod controller;
mod list;

#[cfg(test)]
mod tests;

pub use controller::{
    MeasureMode, MeasureOutcome, MeasurementController, ScaleCalibration, measure_areas,
};
pub use list::{MeasurementKind, MeasurementList, MeasurementRow, format_value};
