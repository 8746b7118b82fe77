// Calibration session error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// Single source of truth for the numeric codes reported by the CLI.
///
/// Error code range: 2001-2006
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// Session was started while already running
    pub const ALREADY_RUNNING: i32 = 2001;

    /// Operation requires a running session
    pub const NOT_RUNNING: i32 = 2002;

    /// Session already produced its report
    pub const ALREADY_TERMINATED: i32 = 2003;

    /// Sample contained NaN or infinity
    pub const NON_FINITE_SAMPLE: i32 = 2004;

    /// Configuration value out of range
    pub const INVALID_CONFIG: i32 = 2005;

    /// Rating thresholds are not strictly increasing
    pub const THRESHOLDS_NOT_INCREASING: i32 = 2006;
}

/// Log a calibration error with structured context
///
/// Logs the numeric code, the component and the human-readable message
/// alongside the caller-supplied context.
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=CalibrationSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// These errors cover session lifecycle misuse, sample validation and
/// configuration checks. The extrema tracker and the evaluator never fail.
///
/// Error code ranges: 2001-2006
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Session was started while already running
    AlreadyRunning,

    /// Operation requires a running session
    NotRunning,

    /// Session already terminated and produced its report
    AlreadyTerminated,

    /// Sample contained a non-finite axis value
    NonFiniteSample { axis: char, value: f32 },

    /// Configuration value out of range
    InvalidConfig { reason: String },

    /// Rating thresholds must satisfy excellent < good < fair
    ThresholdsNotIncreasing { excellent: f32, good: f32, fair: f32 },
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::AlreadyRunning => CalibrationErrorCodes::ALREADY_RUNNING,
            CalibrationError::NotRunning => CalibrationErrorCodes::NOT_RUNNING,
            CalibrationError::AlreadyTerminated => CalibrationErrorCodes::ALREADY_TERMINATED,
            CalibrationError::NonFiniteSample { .. } => CalibrationErrorCodes::NON_FINITE_SAMPLE,
            CalibrationError::InvalidConfig { .. } => CalibrationErrorCodes::INVALID_CONFIG,
            CalibrationError::ThresholdsNotIncreasing { .. } => {
                CalibrationErrorCodes::THRESHOLDS_NOT_INCREASING
            }
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::AlreadyRunning => "Calibration session already running".to_string(),
            CalibrationError::NotRunning => "Calibration session not running".to_string(),
            CalibrationError::AlreadyTerminated => {
                "Calibration session already terminated".to_string()
            }
            CalibrationError::NonFiniteSample { axis, value } => {
                format!("Non-finite sample on {} axis: {}", axis, value)
            }
            CalibrationError::InvalidConfig { reason } => {
                format!("Invalid configuration: {}", reason)
            }
            CalibrationError::ThresholdsNotIncreasing {
                excellent,
                good,
                fair,
            } => format!(
                "Rating thresholds must increase: excellent={}, good={}, fair={}",
                excellent, good, fair
            ),
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}
