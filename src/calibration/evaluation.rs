// Error metrics and quality rating for a finished verification session
//
// Each axis should read +1g and -1g at some point during the six-pose
// rotation. The per-axis error averages how far the observed positive and
// negative extremes are from those ideals; the worst axis drives the rating.

use crate::calibration::extrema::{AxisRange, ExtremaState};
use crate::error::CalibrationError;

/// Expected magnitude of an axis aligned with gravity, in g
pub const REFERENCE_G: f32 = 1.0;

/// Per-axis error plus the overall (worst-axis) error
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorMetrics {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub overall: f32,
}

impl ErrorMetrics {
    /// Compute metrics from terminal extrema
    pub fn from_extrema(extrema: &ExtremaState) -> Self {
        let x = axis_error(&extrema.x);
        let y = axis_error(&extrema.y);
        let z = axis_error(&extrema.z);
        Self {
            x,
            y,
            z,
            overall: worst_of([x, y, z]),
        }
    }

    /// Per-axis errors paired with their labels, in x/y/z order
    pub fn axes(&self) -> [(char, f32); 3] {
        [('x', self.x), ('y', self.y), ('z', self.z)]
    }
}

// NaN on any axis makes the overall NaN; f32::max would drop it
fn worst_of(errors: [f32; 3]) -> f32 {
    errors
        .into_iter()
        .fold(0.0, |acc, e| if e.is_nan() || e > acc { e } else { acc })
}

/// Symmetric deviation of an axis range from [-1g, +1g]
pub fn axis_error(range: &AxisRange) -> f32 {
    ((range.max - REFERENCE_G).abs() + (range.min + REFERENCE_G).abs()) / 2.0
}

/// Qualitative verdict derived from the overall error
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    /// Short name shown on the result screen
    pub fn display_name(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "Excellent!",
            QualityRating::Good => "Good",
            QualityRating::Fair => "Fair",
            QualityRating::Poor => "Poor",
        }
    }

    /// Verdict written to the plain-text log record
    pub fn log_verdict(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "Excellent!",
            QualityRating::Good => "Good",
            QualityRating::Fair => "Fair",
            QualityRating::Poor => "Poor, recalibration needed!",
        }
    }

    /// Whether the sensor should be recalibrated
    pub fn needs_recalibration(&self) -> bool {
        matches!(self, QualityRating::Poor)
    }
}

/// Exclusive upper bounds on overall error for each rating
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    pub excellent: f32,
    pub good: f32,
    pub fair: f32,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.1,
            good: 0.2,
            fair: 0.3,
        }
    }
}

impl RatingThresholds {
    /// Check excellent < good < fair and that every bound is finite
    pub fn validate(&self) -> Result<(), CalibrationError> {
        let finite =
            self.excellent.is_finite() && self.good.is_finite() && self.fair.is_finite();
        if !finite || !(self.excellent < self.good && self.good < self.fair) {
            return Err(CalibrationError::ThresholdsNotIncreasing {
                excellent: self.excellent,
                good: self.good,
                fair: self.fair,
            });
        }
        Ok(())
    }

    /// Rate an overall error (strict less-than on every bound)
    pub fn rate(&self, overall_error: f32) -> QualityRating {
        if overall_error < self.excellent {
            QualityRating::Excellent
        } else if overall_error < self.good {
            QualityRating::Good
        } else if overall_error < self.fair {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        }
    }
}

/// Score terminal extrema
pub fn evaluate(
    extrema: &ExtremaState,
    thresholds: &RatingThresholds,
) -> (ErrorMetrics, QualityRating) {
    let metrics = ErrorMetrics::from_extrema(extrema);
    let rating = thresholds.rate(metrics.overall);
    (metrics, rating)
}
