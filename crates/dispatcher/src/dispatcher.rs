//! Dispatcher - main loop from the measurement log to the estimator

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use contracts::{DispatchConfig, ImuSample, NoiseParams, Record, RobotState, StateEstimator};
use ingestion::{IngestionError, LineSource, RecordParser};
use temporal_gate::{GateDecision, TemporalGate};
use tracing::{debug, info, instrument, warn};

use crate::contact::ContactTracker;
use crate::error::DispatcherError;
use crate::metrics::DispatchSummary;

/// What the dispatcher did with one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchOutcome {
    /// IMU record; the previous sample was propagated over `dt`
    Propagated { dt: f64 },
    /// IMU record; the gate rejected `dt`, nothing was propagated
    PropagationSkipped { dt: f64, decision: GateDecision },
    /// Contact set forwarded
    ContactsForwarded { count: usize },
    /// Kinematic correction applied
    KinematicsCorrected { count: usize },
    /// Unknown tag or blank line
    Ignored,
}

/// The main Dispatcher that feeds log records to an estimator
///
/// Propagation is one step delayed: an admitted IMU record propagates the
/// sample cached from the previous IMU record over the new `dt`, then
/// replaces the cache.
pub struct Dispatcher<E> {
    estimator: E,
    config: DispatchConfig,
    parser: RecordParser,
    gate: TemporalGate,
    contacts: ContactTracker,
    previous_timestamp: f64,
    previous_imu: ImuSample,
    lines_read: usize,
    aggregator: observability::DispatchMetricsAggregator,
}

impl<E: StateEstimator> Dispatcher<E> {
    /// Create a dispatcher around an estimator
    ///
    /// The cache starts at `t = 0` with a zero IMU sample.
    pub fn new(config: DispatchConfig, estimator: E) -> Self {
        Self {
            estimator,
            config,
            parser: RecordParser::new(),
            gate: TemporalGate::new(config.gate),
            contacts: ContactTracker::new(),
            previous_timestamp: 0.0,
            previous_imu: ImuSample::default(),
            lines_read: 0,
            aggregator: Default::default(),
        }
    }

    /// One-time estimator setup; call before the first record
    pub fn initialize(&mut self, state: RobotState, noise: NoiseParams) {
        self.estimator.initialize(state, noise);
    }

    /// Parse and dispatch one line
    ///
    /// A line that fails to parse leaves the cache untouched.
    pub fn dispatch_line(&mut self, line: &str) -> Result<DispatchOutcome, IngestionError> {
        match self.parser.parse(line) {
            Ok(record) => Ok(self.dispatch_record(record)),
            Err(e) => {
                self.record_skipped(&e);
                Err(e)
            }
        }
    }

    fn record_skipped(&mut self, e: &IngestionError) {
        self.aggregator.record_skipped(e.reason());
        observability::record_line_skipped(e.kind(), e.reason());
    }

    /// Dispatch an already parsed record
    pub fn dispatch_record(&mut self, record: Record) -> DispatchOutcome {
        match record {
            Record::Imu(sample) => {
                let (dt, decision) = self
                    .gate
                    .evaluate_between(self.previous_timestamp, sample.timestamp);

                if decision.is_admitted() {
                    self.estimator.propagate(&self.previous_imu, dt);
                }
                self.aggregator.record_propagation(decision.as_str(), dt);
                observability::record_propagation(decision.as_str(), dt);

                self.previous_imu = sample;
                self.previous_timestamp = sample.timestamp;

                if decision.is_admitted() {
                    DispatchOutcome::Propagated { dt }
                } else {
                    debug!(t = sample.timestamp, dt, %decision, "propagation skipped");
                    DispatchOutcome::PropagationSkipped { dt, decision }
                }
            }
            Record::Contact(set) => {
                let count = self.contacts.forward(&mut self.estimator, &set);
                self.aggregator.record_contacts();
                observability::record_contacts_forwarded(count);

                self.previous_timestamp = set.timestamp;
                DispatchOutcome::ContactsForwarded { count }
            }
            Record::Kinematic(observation) => {
                let count = observation.measurements.len();
                debug!(t = observation.timestamp, bodies = count, "correcting kinematics");
                self.estimator.correct_kinematics(&observation.measurements);
                self.aggregator.record_kinematics(count);
                observability::record_kinematic_correction(count);

                self.previous_timestamp = observation.timestamp;
                DispatchOutcome::KinematicsCorrected { count }
            }
            Record::Unknown { tag } => {
                debug!(tag = %tag, "ignoring record");
                self.aggregator.record_ignored();
                DispatchOutcome::Ignored
            }
        }
    }

    /// Run the dispatcher main loop over a reader
    ///
    /// Returns when input reaches end of stream. In strict mode the first
    /// failing line aborts the run; otherwise it is logged and skipped.
    #[instrument(
        name = "dispatcher_run",
        skip(self, reader),
        fields(estimator = %self.estimator.name(), strict = self.config.strict)
    )]
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<DispatchSummary, DispatcherError> {
        info!("Dispatcher started");

        for (line_no, line) in LineSource::new(reader) {
            let result = match line {
                Ok(line) => {
                    self.lines_read += 1;
                    self.dispatch_line(&line).map(|_| ())
                }
                Err(e) if e.is_fatal() => return Err(DispatcherError::record(line_no, e)),
                Err(e) => {
                    self.lines_read += 1;
                    self.record_skipped(&e);
                    Err(e)
                }
            };

            if let Err(e) = result {
                if self.config.strict {
                    return Err(DispatcherError::record(line_no, e));
                }
                warn!(line = line_no, error = %e, "skipping record");
            }

            if line_no % 1000 == 0 {
                debug!(lines = line_no, "Dispatcher progress");
            }
        }

        let summary = self.summary();
        info!(
            lines = summary.lines_read,
            propagations = summary.dispatch.propagations,
            skipped = summary.skipped(),
            "Dispatcher input exhausted"
        );
        Ok(summary)
    }

    /// Open a log file and run over it
    pub fn run_path(&mut self, path: &Path) -> Result<DispatchSummary, DispatcherError> {
        let file = File::open(path)?;
        info!(path = %path.display(), "Replaying measurement log");
        self.run(BufReader::new(file))
    }

    /// Counters collected so far
    pub fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            lines_read: self.lines_read,
            parser: self.parser.metrics(),
            dispatch: self.aggregator.summary(),
        }
    }

    /// Estimator state (read-only)
    pub fn state(&self) -> &RobotState {
        self.estimator.state()
    }

    /// Estimator noise parameters (read-only)
    pub fn noise_params(&self) -> &NoiseParams {
        self.estimator.noise_params()
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn into_estimator(self) -> E {
        self.estimator
    }

    /// Timestamp of the last dispatched record
    pub fn previous_timestamp(&self) -> f64 {
        self.previous_timestamp
    }

    /// IMU sample the next admitted propagation will use
    pub fn previous_imu(&self) -> &ImuSample {
        &self.previous_imu
    }
}

/// Convenience function to create an initialized dispatcher
#[instrument(name = "dispatcher_create", skip_all, fields(estimator = %estimator.name()))]
pub fn create_dispatcher<E: StateEstimator>(
    config: DispatchConfig,
    estimator: E,
    state: RobotState,
    noise: NoiseParams,
) -> Dispatcher<E> {
    let mut dispatcher = Dispatcher::new(config, estimator);
    dispatcher.initialize(state, noise);
    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::{EstimatorCall, LogEstimator, RecordingEstimator};
    use contracts::{ContactPair, GateConfig};
    use nalgebra::Vector3;
    use std::io::Cursor;

    fn recording() -> Dispatcher<RecordingEstimator> {
        create_dispatcher(
            DispatchConfig::default(),
            RecordingEstimator::new(),
            RobotState::default(),
            NoiseParams::default(),
        )
    }

    fn kinematic_line(t: f64, q: &str, p: &str) -> String {
        let cov: Vec<String> = (0..36).map(|i| i.to_string()).collect();
        format!("KINEMATIC {t} 0 {q} {p} {}", cov.join(" "))
    }

    #[test]
    fn test_initialize_called_first() {
        let dispatcher = recording();
        assert!(matches!(
            dispatcher.estimator().calls(),
            [EstimatorCall::Initialize { .. }]
        ));
    }

    #[test]
    fn test_propagates_previous_sample() {
        let mut dispatcher = recording();
        dispatcher.dispatch_line("IMU 0.000 0 0 0 0 0 0").unwrap();
        let outcome = dispatcher.dispatch_line("IMU 0.100 0 0 0 0 0 9.81").unwrap();
        assert!(matches!(outcome, DispatchOutcome::Propagated { .. }));

        let propagations = dispatcher.estimator().propagations();
        assert_eq!(propagations.len(), 1);
        let (sample, dt) = propagations[0];
        assert!((dt - 0.1).abs() < 1e-12);
        assert_eq!(sample.timestamp, 0.0);
        assert_eq!(sample.linear_acceleration, Vector3::zeros());

        assert_eq!(
            dispatcher.previous_imu().linear_acceleration,
            Vector3::new(0.0, 0.0, 9.81)
        );
    }

    #[test]
    fn test_duplicate_timestamp_still_updates_cache() {
        let mut dispatcher = recording();
        dispatcher.dispatch_line("IMU 0.500 0 0 0 0 0 1").unwrap();
        let propagated_before = dispatcher.estimator().propagations().len();

        let outcome = dispatcher.dispatch_line("IMU 0.500 0 0 0 0 0 2").unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::PropagationSkipped {
                dt: 0.0,
                decision: GateDecision::TooShort
            }
        );
        assert_eq!(dispatcher.estimator().propagations().len(), propagated_before);
        assert_eq!(dispatcher.previous_imu().linear_acceleration.z, 2.0);
    }

    #[test]
    fn test_large_gap_not_admitted() {
        let mut dispatcher = recording();
        dispatcher.dispatch_line("IMU -3.0 0 0 0 0 0 0").unwrap();
        let outcome = dispatcher.dispatch_line("IMU 2.000 0 0 0 0 0 0").unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::PropagationSkipped {
                dt: 5.0,
                decision: GateDecision::TooLong
            }
        );
        assert!(dispatcher.estimator().propagations().is_empty());
    }

    #[test]
    fn test_first_imu_gated_against_zero() {
        let mut dispatcher = recording();
        let outcome = dispatcher.dispatch_line("IMU 0.010 1 1 1 1 1 1").unwrap();
        assert!(matches!(outcome, DispatchOutcome::Propagated { .. }));
        let (sample, _) = dispatcher.estimator().propagations()[0];
        assert_eq!(sample, ImuSample::default());
    }

    #[test]
    fn test_contact_and_kinematic_update_timestamp() {
        let mut dispatcher = recording();
        dispatcher.dispatch_line("IMU 0.10 0 0 0 0 0 0").unwrap();
        dispatcher.dispatch_line("CONTACT 0.15 0 1 1 0").unwrap();
        assert_eq!(dispatcher.previous_timestamp(), 0.15);

        dispatcher
            .dispatch_line(&kinematic_line(0.18, "1 0 0 0", "1 2 3"))
            .unwrap();
        assert_eq!(dispatcher.previous_timestamp(), 0.18);

        // dt measured from the kinematic record, sample from the last IMU
        dispatcher.dispatch_line("IMU 0.20 0 0 0 0 0 0").unwrap();
        let (sample, dt) = *dispatcher.estimator().propagations().last().unwrap();
        assert!((dt - 0.02).abs() < 1e-12);
        assert_eq!(sample.timestamp, 0.10);
    }

    #[test]
    fn test_contact_forwarded_verbatim() {
        let mut dispatcher = recording();
        let outcome = dispatcher.dispatch_line("CONTACT 1.0 0 1 1 0").unwrap();
        assert_eq!(outcome, DispatchOutcome::ContactsForwarded { count: 2 });
        assert_eq!(
            dispatcher.estimator().contacts(),
            &[ContactPair::new(0, true), ContactPair::new(1, false)]
        );
    }

    #[test]
    fn test_kinematic_forwarded() {
        let mut dispatcher = recording();
        dispatcher
            .dispatch_line(&kinematic_line(1.0, "1 0 0 0", "1 2 3"))
            .unwrap();
        let corrections = dispatcher.estimator().corrections();
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0][0].translation(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(corrections[0][0].covariance[(2, 3)], 15.0);
    }

    #[test]
    fn test_unknown_is_noop() {
        let mut dispatcher = recording();
        dispatcher.dispatch_line("IMU 0.3 0 0 0 0 0 0").unwrap();
        let calls = dispatcher.estimator().calls().len();

        assert_eq!(dispatcher.dispatch_line("GPS 9.0 1 2 3").unwrap(), DispatchOutcome::Ignored);
        assert_eq!(dispatcher.dispatch_line("").unwrap(), DispatchOutcome::Ignored);
        assert_eq!(dispatcher.estimator().calls().len(), calls);
        assert_eq!(dispatcher.previous_timestamp(), 0.3);
    }

    #[test]
    fn test_bad_line_leaves_cache() {
        let mut dispatcher = recording();
        dispatcher.dispatch_line("IMU 0.3 0 0 0 0 0 7").unwrap();
        assert!(dispatcher.dispatch_line("IMU 0.4 0 0 0 0 0").is_err());
        assert!(dispatcher.dispatch_line("CONTACT 0.5 0").is_err());
        assert_eq!(dispatcher.previous_timestamp(), 0.3);
        assert_eq!(dispatcher.previous_imu().linear_acceleration.z, 7.0);
    }

    #[test]
    fn test_run_lenient_skips() {
        let log = "IMU 0.0 0 0 0 0 0 0\nIMU 0.1 0 0 0\nIMU 0.2 0 0 0 0 0 0\n";
        let mut dispatcher = recording();
        let summary = dispatcher.run(Cursor::new(log)).unwrap();

        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.parser.imu_records, 2);
        assert_eq!(summary.dispatch.skipped_by_reason.get("malformed"), Some(&1));

        // 0.0 -> 0.2: the skipped line did not move the clock
        let propagations = dispatcher.estimator().propagations();
        assert_eq!(propagations.len(), 1);
        assert!((propagations[0].1 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_run_lenient_skips_invalid_utf8() {
        let mut log = b"IMU 0.0 0 0 0 0 0 0\n".to_vec();
        log.extend_from_slice(b"\xff\xfe garbage\n");
        log.extend_from_slice(b"IMU 0.1 0 0 0 0 0 0\n");

        let mut dispatcher = recording();
        let summary = dispatcher.run(Cursor::new(log.clone())).unwrap();

        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.dispatch.skipped_by_reason.get("encoding"), Some(&1));
        let propagations = dispatcher.estimator().propagations();
        assert_eq!(propagations.len(), 1);
        assert!((propagations[0].1 - 0.1).abs() < 1e-12);

        let mut strict = Dispatcher::new(
            DispatchConfig::strict(GateConfig::default()),
            RecordingEstimator::new(),
        );
        let err = strict.run(Cursor::new(log)).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(
            err,
            DispatcherError::Record {
                source: IngestionError::InvalidEncoding { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_run_strict_aborts() {
        let log = "IMU 0.0 0 0 0 0 0 0\nCONTACT 0.1 0 x\nIMU 0.2 0 0 0 0 0 0\n";
        let config = DispatchConfig::strict(GateConfig::default());
        let mut dispatcher = Dispatcher::new(config, RecordingEstimator::new());

        let err = dispatcher.run(Cursor::new(log)).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(
            err,
            DispatcherError::Record {
                source: IngestionError::NumericParse { .. },
                ..
            }
        ));
        assert!(dispatcher.estimator().propagations().is_empty());
    }

    #[test]
    fn test_custom_gate_thresholds() {
        let config = DispatchConfig {
            strict: false,
            gate: GateConfig {
                dt_min: 0.05,
                dt_max: 0.5,
            },
        };
        let mut dispatcher = Dispatcher::new(config, RecordingEstimator::new());
        let log = "IMU 0.01 0 0 0 0 0 0\nIMU 0.1 0 0 0 0 0 0\nIMU 0.8 0 0 0 0 0 0\n";
        let summary = dispatcher.run(Cursor::new(log)).unwrap();

        assert_eq!(summary.dispatch.propagations, 1);
        assert_eq!(summary.dispatch.gate_rejections.get("too_short"), Some(&1));
        assert_eq!(summary.dispatch.gate_rejections.get("too_long"), Some(&1));
    }

    #[test]
    fn test_run_path_with_log_estimator() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "IMU 0.00 0 0 0 0 0 0").unwrap();
        writeln!(file, "CONTACT 0.01 0 1").unwrap();
        writeln!(file, "IMU 0.02 0 0 0 0 0 0").unwrap();

        let mut dispatcher = create_dispatcher(
            DispatchConfig::default(),
            LogEstimator::new("log"),
            RobotState::default(),
            NoiseParams::default(),
        );
        let summary = dispatcher.run_path(file.path()).unwrap();

        assert_eq!(summary.lines_read, 3);
        assert_eq!(dispatcher.estimator().propagations(), 1);
        assert_eq!(dispatcher.state(), &RobotState::default());
        assert_eq!(dispatcher.noise_params(), &NoiseParams::default());
    }

    #[test]
    fn test_run_path_missing_file() {
        let mut dispatcher = recording();
        let err = dispatcher
            .run_path(Path::new("/no/such/measurements.txt"))
            .unwrap_err();
        assert!(matches!(err, DispatcherError::Io(_)));
    }
}
