//! Built-in estimator implementations

mod log;
mod recording;

pub use self::log::LogEstimator;
pub use self::recording::{EstimatorCall, RecordingEstimator};
