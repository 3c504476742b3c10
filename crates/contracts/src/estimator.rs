//! StateEstimator trait - Dispatcher output interface
//!
//! Defines the abstract boundary to the contact-aided inertial estimator.
//! The dispatcher only pushes data through it; estimation math lives behind it.

use crate::{ContactPair, ImuSample, KinematicMeasurement, NoiseParams, RobotState};

/// Estimator interface
///
/// All estimator implementations (real filters, loggers, test doubles) must
/// implement this trait. Every call is synchronous and returns before the
/// next record is processed.
pub trait StateEstimator {
    /// Estimator name (used for logging)
    fn name(&self) -> &str;

    /// One-time setup before the first record
    fn initialize(&mut self, state: RobotState, noise: NoiseParams);

    /// Advance the state with an inertial sample held over `dt` seconds
    fn propagate(&mut self, imu: &ImuSample, dt: f64);

    /// Replace the contact hypothesis with `contacts`
    fn set_contacts(&mut self, contacts: &[ContactPair]);

    /// Apply a correction from leg kinematics
    fn correct_kinematics(&mut self, measurements: &[KinematicMeasurement]);

    /// Current state mean (read-only)
    fn state(&self) -> &RobotState;

    /// Noise parameters in use (read-only)
    fn noise_params(&self) -> &NoiseParams;
}

impl<E: StateEstimator + ?Sized> StateEstimator for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn initialize(&mut self, state: RobotState, noise: NoiseParams) {
        (**self).initialize(state, noise)
    }

    fn propagate(&mut self, imu: &ImuSample, dt: f64) {
        (**self).propagate(imu, dt)
    }

    fn set_contacts(&mut self, contacts: &[ContactPair]) {
        (**self).set_contacts(contacts)
    }

    fn correct_kinematics(&mut self, measurements: &[KinematicMeasurement]) {
        (**self).correct_kinematics(measurements)
    }

    fn state(&self) -> &RobotState {
        (**self).state()
    }

    fn noise_params(&self) -> &NoiseParams {
        (**self).noise_params()
    }
}
