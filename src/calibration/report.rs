// Verification report produced once when a session terminates
//
// The same numbers are rendered two ways: the compact result screen and the
// plain-text log record kept for off-device inspection.

use crate::calibration::evaluation::{evaluate, ErrorMetrics, QualityRating, RatingThresholds};
use crate::calibration::extrema::ExtremaState;

/// Heading of the result screen
pub const RESULT_TITLE: &str = "Accel Verify Result:";

/// First line of the plain-text log record
pub const LOG_TITLE: &str = "Accelerometer Calibration Verify Result:";

/// Final outcome of a verification session
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VerificationReport {
    pub extrema: ExtremaState,
    pub metrics: ErrorMetrics,
    pub rating: QualityRating,
    pub samples_accepted: u64,
    pub samples_rejected: u64,
    pub steps_advanced: u64,
    pub duration_ms: u64,
}

impl VerificationReport {
    /// Score extrema and wrap them with session statistics
    pub fn new(
        extrema: ExtremaState,
        thresholds: &RatingThresholds,
        samples_accepted: u64,
        samples_rejected: u64,
        steps_advanced: u64,
        duration_ms: u64,
    ) -> Self {
        let (metrics, rating) = evaluate(&extrema, thresholds);
        Self {
            extrema,
            metrics,
            rating,
            samples_accepted,
            samples_rejected,
            steps_advanced,
            duration_ms,
        }
    }

    /// Report for bare extrema with no session statistics attached
    pub fn from_extrema(extrema: ExtremaState, thresholds: &RatingThresholds) -> Self {
        Self::new(extrema, thresholds, 0, 0, 0, 0)
    }

    /// Human-readable classification line
    pub fn classification(&self) -> String {
        format!("Calibration: {}", self.rating.display_name())
    }

    /// Lines of the result screen
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);
        lines.push(RESULT_TITLE.to_string());
        for ((axis, range), (_, err)) in self.extrema.axes().iter().zip(self.metrics.axes()) {
            lines.push(format!(
                "{}: {:.3}g ~ {:.3}g (err:{:.3})",
                axis.to_ascii_uppercase(),
                range.min,
                range.max,
                err
            ));
        }
        lines.push(self.classification());
        lines
    }

    /// Lines of the plain-text log record
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);
        lines.push(LOG_TITLE.to_string());
        for ((axis, range), (_, err)) in self.extrema.axes().iter().zip(self.metrics.axes()) {
            lines.push(format!(
                "{} range: {:.3}g to {:.3}g (error: {:.3})",
                axis.to_ascii_uppercase(),
                range.min,
                range.max,
                err
            ));
        }
        lines.push(format!(
            "Max error: {:.3} - {}",
            self.metrics.overall,
            self.rating.log_verdict()
        ));
        lines
    }

    /// Plain-text log record as a single string
    pub fn log_record(&self) -> String {
        self.log_lines().join("\n")
    }

    /// Emit the log record through `tracing`, one event per line
    pub fn emit_log_record(&self) {
        for line in self.log_lines() {
            tracing::info!(target: "accel_verify::report", "{}", line);
        }
        if self.samples_rejected > 0 {
            tracing::warn!(
                target: "accel_verify::report",
                "{} non-finite samples were rejected during the session",
                self.samples_rejected
            );
        }
    }
}
