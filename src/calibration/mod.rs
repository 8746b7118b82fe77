// Calibration module - accelerometer calibration verification
//
// This module provides the verification engine:
// 1. ExtremaState: running min/max per axis
// 2. OrientationClock: time-driven six-pose prompt cycle
// 3. CalibrationSession: Idle/Running/Terminated state machine
// 4. evaluate: extrema -> per-axis error, overall error, rating
//
// The verification workflow:
// 1. SessionRunner starts a CalibrationSession and shows the instructions
// 2. Samples widen the extrema while the prompt cycles every dwell interval
// 3. On cancel the session terminates and the report is rendered once

pub mod evaluation;
pub mod extrema;
pub mod orientation;
pub mod progress;
pub mod report;
pub mod runner;
pub mod session;
pub mod validation;

pub use evaluation::{evaluate, ErrorMetrics, QualityRating, RatingThresholds};
pub use extrema::{AxisRange, ExtremaState};
pub use orientation::{Orientation, OrientationClock};
pub use progress::{SessionProgress, SessionState};
pub use report::VerificationReport;
pub use runner::{SessionDisplay, SessionRunner, StopReason};
pub use session::CalibrationSession;
pub use validation::SampleValidator;
