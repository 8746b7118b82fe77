// Accel Verify Core - accelerometer calibration verification engine
// Six-pose extrema tracking with a time-driven prompt cycle and error scoring

// Module declarations
pub mod calibration;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod live;
pub mod sensor;
pub mod testing;

// Re-exports for convenience
pub use calibration::{
    CalibrationSession, Orientation, QualityRating, SessionRunner, VerificationReport,
};
pub use config::AppConfig;
pub use sensor::{AxisTriple, SampleSource, SensorReading};

/// Install the `tracing` subscriber used by host binaries
///
/// Events go to stderr so stdout stays free for reports. `log` records are
/// bridged into the same subscriber. Calling this twice is harmless.
pub fn init_logging(max_level: tracing::Level) {
    let result = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_ok() {
        tracing::debug!("Logging initialised at {}", max_level);
    }
}
