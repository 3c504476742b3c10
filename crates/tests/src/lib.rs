//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 → 分发器 → 记录型估计器 的 e2e 测试
//! - 样例日志回放

#[cfg(test)]
mod contract_tests {
    use contracts::{GateConfig, NoiseParams, RecordKind};

    #[test]
    fn test_default_constants() {
        let gate = GateConfig::default();
        assert_eq!(gate.dt_min, 1e-6);
        assert_eq!(gate.dt_max, 1.0);

        let noise = NoiseParams::default();
        assert_eq!(noise.gyroscope_cov()[(0, 0)], 0.01 * 0.01);
        assert_eq!(noise.contact_cov()[(2, 2)], 0.01 * 0.01);

        let tags: Vec<_> = RecordKind::ALL.iter().map(|k| k.as_tag()).collect();
        assert_eq!(tags, ["IMU", "CONTACT", "KINEMATIC"]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::{Cursor, Write};

    use config_loader::ConfigLoader;
    use contracts::{ContactPair, ReplayBlueprint};
    use dispatcher::{
        create_dispatcher, DispatchOutcome, Dispatcher, DispatcherError, EstimatorCall,
        RecordingEstimator,
    };
    use ingestion::IngestionError;
    use nalgebra::{Matrix3, Vector3};
    use temporal_gate::GateDecision;

    const SAMPLE_LOG: &str = include_str!("../../../data/sample_measurements.txt");

    /// Config file + log file on disk, loaded through the config loader
    struct Fixture {
        _config: tempfile::NamedTempFile,
        _log: tempfile::NamedTempFile,
        blueprint: ReplayBlueprint,
    }

    fn fixture(log: &str, extra_config: &str) -> Fixture {
        let mut log_file = tempfile::NamedTempFile::new().unwrap();
        log_file.write_all(log.as_bytes()).unwrap();

        let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            config_file,
            "[input]\npath = {:?}\n{extra_config}",
            log_file.path().display().to_string()
        )
        .unwrap();

        let blueprint = ConfigLoader::load_from_path(config_file.path()).unwrap();
        Fixture {
            _config: config_file,
            _log: log_file,
            blueprint,
        }
    }

    fn replay(fixture: &Fixture) -> Dispatcher<RecordingEstimator> {
        let bp = &fixture.blueprint;
        let mut dispatcher = create_dispatcher(
            bp.dispatch,
            RecordingEstimator::new(),
            bp.initial_robot_state(),
            bp.noise,
        );
        dispatcher.run_path(&bp.input.path).unwrap();
        dispatcher
    }

    fn kinematic_line(t: f64, id: i32, quaternion: &str, position: &str) -> String {
        let cov: Vec<String> = (0..36).map(|i| i.to_string()).collect();
        format!("KINEMATIC {t} {id} {quaternion} {position} {}", cov.join(" "))
    }

    #[test]
    fn test_scenario_propagate_with_previous_sample() {
        let f = fixture("IMU 0.000 0 0 0 0 0 0\nIMU 0.100 0 0 0 0 0 9.81\n", "");
        let dispatcher = replay(&f);

        let propagations = dispatcher.estimator().propagations();
        assert_eq!(propagations.len(), 1);
        let (sample, dt) = propagations[0];
        assert!((dt - 0.1).abs() < 1e-12);
        assert_eq!(sample.angular_velocity, Vector3::zeros());
        assert_eq!(sample.linear_acceleration, Vector3::zeros());
    }

    #[test]
    fn test_scenario_duplicate_timestamp() {
        let f = fixture("IMU 0.500 0 0 0 0 0 1\nIMU 0.500 0 0 0 0 0 2\n", "");
        let dispatcher = replay(&f);

        // only the first line (dt = 0.5 from the initial cache) propagates
        assert_eq!(dispatcher.estimator().propagations().len(), 1);
        assert_eq!(dispatcher.previous_imu().linear_acceleration.z, 2.0);
        assert_eq!(
            dispatcher.summary().dispatch.gate_rejections.get("too_short"),
            Some(&1)
        );
    }

    #[test]
    fn test_scenario_contact_forwarding() {
        let f = fixture("CONTACT 1.0 0 1 1 0\n", "");
        let dispatcher = replay(&f);

        assert_eq!(
            dispatcher.estimator().contact_updates(),
            vec![vec![ContactPair::new(0, true), ContactPair::new(1, false)]]
        );
    }

    #[test]
    fn test_scenario_kinematic_pose() {
        let f = fixture(&format!("{}\n", kinematic_line(1.0, 7, "1 0 0 0", "1 2 3")), "");
        let dispatcher = replay(&f);

        let corrections = dispatcher.estimator().corrections();
        assert_eq!(corrections.len(), 1);
        let measurement = &corrections[0][0];
        assert_eq!(measurement.body_id, 7);
        assert_eq!(measurement.rotation(), Matrix3::identity());
        assert_eq!(measurement.translation(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(measurement.covariance[(2, 3)], 15.0);
    }

    #[test]
    fn test_scenario_gap_exceeds_dt_max() {
        let f = fixture("IMU -3.0 0 0 0 0 0 0\nIMU 2.000 0 0 0 0 0 0\n", "");
        let dispatcher = replay(&f);

        assert!(dispatcher.estimator().propagations().is_empty());
        let rejections = dispatcher.summary().dispatch.gate_rejections;
        assert_eq!(rejections.get("too_short"), Some(&1));
        assert_eq!(rejections.get("too_long"), Some(&1));
    }

    #[test]
    fn test_config_gate_thresholds_apply() {
        let f = fixture(
            "IMU 0.0 0 0 0 0 0 0\nIMU 2.0 0 0 0 0 0 0\n",
            "[dispatch.gate]\ndt_min = 0.0\ndt_max = 5.0\n",
        );
        let dispatcher = replay(&f);

        let propagations = dispatcher.estimator().propagations();
        assert_eq!(propagations.len(), 1);
        assert_eq!(propagations[0].1, 2.0);
    }

    #[test]
    fn test_initial_state_reaches_estimator_first() {
        let f = fixture(
            "IMU 0.1 0 0 0 0 0 0\n",
            "[noise]\ncontact = 0.05\n\n[initial_state]\nvelocity = [1.0, 0.0, 0.0]\n",
        );
        let dispatcher = replay(&f);

        match &dispatcher.estimator().calls()[0] {
            EstimatorCall::Initialize { state, noise } => {
                assert_eq!(state.velocity, Vector3::new(1.0, 0.0, 0.0));
                assert_eq!(state.rotation[(2, 2)], -1.0);
                assert_eq!(noise.contact, 0.05);
            }
            other => panic!("first call was {other:?}"),
        }
        assert_eq!(dispatcher.noise_params().contact, 0.05);
    }

    #[test]
    fn test_strict_config_aborts_on_bad_line() {
        let f = fixture(
            "IMU 0.1 0 0 0 0 0 0\nKINEMATIC 0.2 1 2 3\nIMU 0.3 0 0 0 0 0 0\n",
            "[dispatch]\nstrict = true\n",
        );
        let bp = &f.blueprint;
        let mut dispatcher = Dispatcher::new(bp.dispatch, RecordingEstimator::new());

        let err = dispatcher.run_path(&bp.input.path).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(
            err,
            DispatcherError::Record {
                source: IngestionError::MalformedRecord { found: 3, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_lenient_run_mixed_errors() {
        let log = [
            "IMU 0.10 0 0 0 0 0 0",
            "IMU 0.20 0 0 0 x 0 0",
            "CONTACT 0.25 0 1 1",
            &kinematic_line(0.27, 0, "0 0 0 0", "0 0 0"),
            "",
            "GPS 0.28 1 2",
            "IMU 0.30 0 0 0 0 0 0",
        ]
        .join("\n");
        let f = fixture(&log, "");
        let dispatcher = replay(&f);

        let summary = dispatcher.summary();
        assert_eq!(summary.lines_read, 7);
        assert_eq!(summary.skipped(), 3);
        assert_eq!(summary.dispatch.skipped_by_reason.get("numeric"), Some(&1));
        assert_eq!(summary.dispatch.skipped_by_reason.get("malformed"), Some(&1));
        assert_eq!(
            summary.dispatch.skipped_by_reason.get("degenerate_quaternion"),
            Some(&1)
        );
        assert_eq!(summary.dispatch.ignored, 2);

        // 0.10 -> 0.30: nothing in between moved the clock
        let propagations = dispatcher.estimator().propagations();
        assert_eq!(propagations.len(), 2);
        assert!((propagations[1].1 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_sample_log_replay() {
        let mut dispatcher = create_dispatcher(
            Default::default(),
            RecordingEstimator::new(),
            Default::default(),
            Default::default(),
        );
        let summary = dispatcher.run(Cursor::new(SAMPLE_LOG)).unwrap();

        assert_eq!(summary.skipped(), 0);
        assert_eq!(summary.parser.imu_records, 40);
        assert_eq!(summary.dispatch.propagations, 40);
        assert_eq!(summary.dispatch.contact_updates, 4);
        assert_eq!(summary.dispatch.kinematic_corrections, 4);
        assert_eq!(summary.dispatch.kinematic_bodies, 16);

        let last = dispatcher.estimator().corrections().pop().unwrap();
        assert!(last.iter().all(|m| m.rotation() == Matrix3::identity()));
        assert_eq!(dispatcher.estimator().contacts().len(), 4);
    }

    #[test]
    fn test_dispatch_outcomes_sequence() {
        let mut dispatcher = Dispatcher::new(Default::default(), RecordingEstimator::new());
        let outcomes: Vec<_> = [
            "IMU 0.01 0 0 0 0 0 0",
            "IMU 0.01 0 0 0 0 0 0",
            "CONTACT 0.02 3 1",
            "UNKNOWN_TAG",
        ]
        .iter()
        .map(|line| dispatcher.dispatch_line(line).unwrap())
        .collect();

        assert_eq!(
            outcomes,
            vec![
                DispatchOutcome::Propagated { dt: 0.01 },
                DispatchOutcome::PropagationSkipped {
                    dt: 0.0,
                    decision: GateDecision::TooShort
                },
                DispatchOutcome::ContactsForwarded { count: 1 },
                DispatchOutcome::Ignored,
            ]
        );
    }
}
