// Error types for the accelerometer verification engine
//
// This module defines custom error types for session and sample-source
// operations, providing structured error handling with stable error codes
// that the CLI and log records can report.

mod calibration;
mod sensor;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use sensor::{log_sensor_error, SensorError, SensorErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library and the CLI.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
