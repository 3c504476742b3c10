//! LogEstimator - logs every estimator call via tracing

use contracts::{
    ContactPair, ImuSample, KinematicMeasurement, NoiseParams, RobotState, StateEstimator,
};
use tracing::{debug, info, instrument};

/// Estimator that logs the call stream for debugging
///
/// Keeps the initialized state, noise parameters, and latest contact
/// hypothesis. It performs no estimation, so `state()` stays at the
/// initial mean.
#[derive(Debug, Default)]
pub struct LogEstimator {
    name: String,
    state: RobotState,
    noise: NoiseParams,
    contacts: Vec<ContactPair>,
    propagations: u64,
    corrections: u64,
}

impl LogEstimator {
    /// Create a new LogEstimator with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Current contact hypothesis
    pub fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }

    /// Number of propagate calls
    pub fn propagations(&self) -> u64 {
        self.propagations
    }

    /// Number of kinematic corrections
    pub fn corrections(&self) -> u64 {
        self.corrections
    }
}

impl StateEstimator for LogEstimator {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_estimator_initialize", skip_all, fields(estimator = %self.name))]
    fn initialize(&mut self, state: RobotState, noise: NoiseParams) {
        info!(
            gyroscope = noise.gyroscope,
            accelerometer = noise.accelerometer,
            contact = noise.contact,
            "estimator initialized"
        );
        self.state = state;
        self.noise = noise;
        self.contacts.clear();
        self.propagations = 0;
        self.corrections = 0;
    }

    fn propagate(&mut self, imu: &ImuSample, dt: f64) {
        self.propagations += 1;
        debug!(
            estimator = %self.name,
            t = imu.timestamp,
            dt,
            gyro_norm = imu.angular_velocity.norm(),
            accel_norm = imu.linear_acceleration.norm(),
            "propagate"
        );
    }

    fn set_contacts(&mut self, contacts: &[ContactPair]) {
        self.contacts = contacts.to_vec();
        debug!(estimator = %self.name, legs = contacts.len(), "contacts replaced");
    }

    fn correct_kinematics(&mut self, measurements: &[KinematicMeasurement]) {
        self.corrections += 1;
        let ids: Vec<i32> = measurements.iter().map(|m| m.body_id).collect();
        debug!(estimator = %self.name, bodies = ?ids, "kinematic correction");
    }

    fn state(&self) -> &RobotState {
        &self.state
    }

    fn noise_params(&self) -> &NoiseParams {
        &self.noise
    }
}
