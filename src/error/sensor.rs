// Sample-source error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Sample-source error code constants
///
/// Error code range: 3001-3003
pub struct SensorErrorCodes {}

impl SensorErrorCodes {
    /// Fixture file does not exist or cannot be read
    pub const FIXTURE_NOT_FOUND: i32 = 3001;

    /// Fixture file or description is malformed
    pub const INVALID_FIXTURE: i32 = 3002;

    /// Scripted fixture has no samples to replay
    pub const EMPTY_FIXTURE: i32 = 3003;
}

/// Log a sample-source error with structured context
pub fn log_sensor_error(err: &SensorError, context: &str) {
    error!(
        "Sensor error in {}: code={}, component=SampleSource, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while building a sample source
///
/// The verification engine assumes `read_sample` always succeeds, so these
/// only surface while a fixture is being loaded or validated.
///
/// Error code ranges: 3001-3003
#[derive(Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Fixture file does not exist or cannot be read
    FixtureNotFound { path: String },

    /// Fixture file or description is malformed
    InvalidFixture { reason: String },

    /// Scripted fixture has no samples to replay
    EmptyFixture { id: String },
}

impl ErrorCode for SensorError {
    fn code(&self) -> i32 {
        match self {
            SensorError::FixtureNotFound { .. } => SensorErrorCodes::FIXTURE_NOT_FOUND,
            SensorError::InvalidFixture { .. } => SensorErrorCodes::INVALID_FIXTURE,
            SensorError::EmptyFixture { .. } => SensorErrorCodes::EMPTY_FIXTURE,
        }
    }

    fn message(&self) -> String {
        match self {
            SensorError::FixtureNotFound { path } => format!("Fixture not found: {}", path),
            SensorError::InvalidFixture { reason } => format!("Invalid fixture: {}", reason),
            SensorError::EmptyFixture { id } => {
                format!("Fixture '{}' has no samples to replay", id)
            }
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SensorError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SensorError {}
