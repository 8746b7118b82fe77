//! Integration tests for the verification workflow
//!
//! These tests drive complete sessions through the public API:
//! - Fixture loading and sample-source construction
//! - SessionRunner with a virtual clock and scripted cancellation
//! - Prompt cycling, report rendering and rating outcomes

use std::path::PathBuf;

use accel_verify::calibration::{
    CalibrationSession, Orientation, QualityRating, RatingThresholds, SessionRunner, SessionState,
    StopReason,
};
use accel_verify::cancel::{CancelAfter, NeverCancel};
use accel_verify::clock::SimulatedClock;
use accel_verify::config::{AppConfig, CalibrationConfig};
use accel_verify::sensor::{FixtureSpec, SyntheticRotationSource, SyntheticSpec};
use accel_verify::testing::RecordingDisplay;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Scripted four-sample run: x and y never reach -1g, so the rating is Poor
#[test]
fn test_four_sample_fixture_rates_poor() {
    let spec = FixtureSpec::load_from_file(fixture_path("four_sample_poor.json")).unwrap();
    let source = spec.build_source().unwrap();
    let mut runner = SessionRunner::new(
        CalibrationSession::new_default(),
        source,
        CancelAfter::new(4),
        SimulatedClock::new(),
        RecordingDisplay::default(),
    );

    let report = runner.run().unwrap();

    assert_close(report.metrics.x, 0.5);
    assert_close(report.metrics.y, 0.495);
    assert_close(report.metrics.z, 0.02);
    assert_close(report.metrics.overall, 0.5);
    assert_eq!(report.rating, QualityRating::Poor);
    assert_eq!(report.samples_accepted, 4);
    assert_eq!(
        report.log_lines().last().map(String::as_str),
        Some("Max error: 0.500 - Poor, recalibration needed!")
    );
}

#[test]
fn test_six_pose_fixture_rates_good() {
    let spec = FixtureSpec::load_from_file(fixture_path("six_pose_good.json")).unwrap();
    let mut runner = SessionRunner::new(
        CalibrationSession::new_default(),
        spec.build_source().unwrap(),
        CancelAfter::new(12),
        SimulatedClock::new(),
        RecordingDisplay::default(),
    );

    let report = runner.run().unwrap();

    assert_eq!(report.rating, QualityRating::Good);
    assert_close(report.metrics.overall, 0.15);
    assert_eq!(
        report.display_lines(),
        vec![
            "Accel Verify Result:".to_string(),
            "X: -0.980g ~ 1.020g (err:0.020)".to_string(),
            "Y: -0.990g ~ 1.010g (err:0.010)".to_string(),
            "Z: -0.850g ~ 1.150g (err:0.150)".to_string(),
            "Calibration: Good".to_string(),
        ]
    );
    assert_eq!(runner.display().reports.len(), 1);
}

#[test]
fn test_synthetic_offset_fixture_rates_fair() {
    let spec = FixtureSpec::load_from_file(fixture_path("synthetic_offset_fair.json")).unwrap();
    let mut runner = SessionRunner::new(
        CalibrationSession::new_default(),
        spec.build_source().unwrap(),
        CancelAfter::new(6 * 20),
        SimulatedClock::new(),
        RecordingDisplay::default(),
    );

    let report = runner.run().unwrap();

    assert_eq!(report.rating, QualityRating::Fair);
    assert!(report.metrics.z > 0.24 && report.metrics.z < 0.26);
    assert!(report.metrics.x < 0.01);
    assert!(report.metrics.y < 0.01);
}

#[test]
fn test_gain_error_rates_good() {
    let spec = SyntheticSpec {
        gain_error: 0.15,
        ..SyntheticSpec::default()
    };
    let mut runner = SessionRunner::new(
        CalibrationSession::new_default(),
        SyntheticRotationSource::new(spec),
        CancelAfter::new(240),
        SimulatedClock::new(),
        RecordingDisplay::default(),
    );

    let report = runner.run().unwrap();

    assert_close(report.metrics.x, 0.15);
    assert_close(report.metrics.y, 0.15);
    assert_close(report.metrics.z, 0.15);
    assert_eq!(report.rating, QualityRating::Good);
}

/// Twelve-second run at the default cadence prompts all six poses and wraps
#[test]
fn test_prompt_cycle_wraps_after_six_poses() {
    let mut runner = SessionRunner::new(
        CalibrationSession::new_default(),
        SyntheticRotationSource::new(SyntheticSpec::default()),
        CancelAfter::new(260),
        SimulatedClock::new(),
        RecordingDisplay::default(),
    );

    let report = runner.run().unwrap();
    let sequence = runner.display().prompt_sequence();

    assert_eq!(
        sequence,
        vec![
            Orientation::FaceUp,
            Orientation::FaceDown,
            Orientation::LeftSideUp,
            Orientation::RightSideUp,
            Orientation::TopUp,
            Orientation::BottomUp,
            Orientation::FaceUp,
        ]
    );
    assert_eq!(report.steps_advanced, 6);
    assert!(runner
        .display()
        .prompts
        .last()
        .is_some_and(|p| p.has_visited_all_poses()));
}

#[test]
fn test_config_file_drives_session() {
    let path = std::env::temp_dir().join(format!(
        "accel-verify-session-config-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"{
            "calibration": { "dwell_ms": 500, "poll_interval_ms": 100, "max_duration_ms": 2000 },
            "evaluation": { "excellent": 0.6, "good": 0.8, "fair": 0.9 }
        }"#,
    )
    .unwrap();
    let config = AppConfig::load_from_file(&path);
    let _ = std::fs::remove_file(&path);
    assert!(config.validate().is_ok());

    let spec = FixtureSpec::load_from_file(fixture_path("four_sample_poor.json")).unwrap();
    let mut runner = SessionRunner::new(
        CalibrationSession::new(config.calibration.clone(), config.evaluation),
        spec.build_source().unwrap(),
        NeverCancel,
        SimulatedClock::new(),
        RecordingDisplay::default(),
    );

    let report = runner.run().unwrap();

    // 100 ms polls for 2 s; advances at 600, 1200 and 1800 ms
    assert_eq!(runner.stop_reason(), Some(StopReason::DurationElapsed));
    assert_eq!(runner.iterations(), 20);
    assert_eq!(report.steps_advanced, 3);
    assert_eq!(report.rating, QualityRating::Excellent);
}

#[test]
fn test_session_lifecycle_through_public_api() {
    let mut session =
        CalibrationSession::new(CalibrationConfig::default(), RatingThresholds::default());
    assert_eq!(session.state(), SessionState::Idle);
    session.start(0).unwrap();
    assert!(session.is_running());

    let report = session.terminate(0).unwrap();
    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(report.rating, QualityRating::Poor);
    let record = report.log_record();
    let mut lines = record.lines();
    assert_eq!(lines.next(), Some("Accelerometer Calibration Verify Result:"));
    assert_eq!(lines.next(), Some("X range: 0.000g to 0.000g (error: 1.000)"));
}

#[test]
fn test_missing_fixture_reports_error() {
    let err = FixtureSpec::load_from_file(fixture_path("does_not_exist.json")).unwrap_err();
    assert!(err.to_string().contains("does_not_exist.json"));
}
