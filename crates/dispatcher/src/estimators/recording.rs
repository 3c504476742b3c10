//! RecordingEstimator - records every call for inspection in tests

use contracts::{
    ContactPair, ImuSample, KinematicMeasurement, NoiseParams, RobotState, StateEstimator,
};

/// One call made on the estimator interface
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatorCall {
    Initialize {
        state: RobotState,
        noise: NoiseParams,
    },
    Propagate {
        imu: ImuSample,
        dt: f64,
    },
    SetContacts(Vec<ContactPair>),
    CorrectKinematics(Vec<KinematicMeasurement>),
}

/// Test double that records the call stream without estimating anything
#[derive(Debug, Default)]
pub struct RecordingEstimator {
    calls: Vec<EstimatorCall>,
    state: RobotState,
    noise: NoiseParams,
    contacts: Vec<ContactPair>,
}

impl RecordingEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in arrival order
    pub fn calls(&self) -> &[EstimatorCall] {
        &self.calls
    }

    /// `(sample, dt)` of every propagate call
    pub fn propagations(&self) -> Vec<(ImuSample, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EstimatorCall::Propagate { imu, dt } => Some((*imu, *dt)),
                _ => None,
            })
            .collect()
    }

    /// Contact sets in arrival order
    pub fn contact_updates(&self) -> Vec<Vec<ContactPair>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EstimatorCall::SetContacts(contacts) => Some(contacts.clone()),
                _ => None,
            })
            .collect()
    }

    /// Kinematic corrections in arrival order
    pub fn corrections(&self) -> Vec<Vec<KinematicMeasurement>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EstimatorCall::CorrectKinematics(measurements) => Some(measurements.clone()),
                _ => None,
            })
            .collect()
    }

    /// Latest contact hypothesis
    pub fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }
}

impl StateEstimator for RecordingEstimator {
    fn name(&self) -> &str {
        "recording"
    }

    fn initialize(&mut self, state: RobotState, noise: NoiseParams) {
        self.state = state.clone();
        self.noise = noise;
        self.calls.push(EstimatorCall::Initialize { state, noise });
    }

    fn propagate(&mut self, imu: &ImuSample, dt: f64) {
        self.calls.push(EstimatorCall::Propagate { imu: *imu, dt });
    }

    fn set_contacts(&mut self, contacts: &[ContactPair]) {
        self.contacts = contacts.to_vec();
        self.calls.push(EstimatorCall::SetContacts(contacts.to_vec()));
    }

    fn correct_kinematics(&mut self, measurements: &[KinematicMeasurement]) {
        self.calls
            .push(EstimatorCall::CorrectKinematics(measurements.to_vec()));
    }

    fn state(&self) -> &RobotState {
        &self.state
    }

    fn noise_params(&self) -> &NoiseParams {
        &self.noise
    }
}
