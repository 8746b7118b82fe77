// Sample validation for the verification session
//
// The tracker itself accepts any value. When the session is configured to
// reject non-finite readings, each sample passes through here first so a
// sensor fault cannot push an extreme to infinity.

use crate::error::CalibrationError;
use crate::sensor::AxisTriple;

/// Validator for incoming accelerometer samples
pub struct SampleValidator;

impl SampleValidator {
    /// Validate a single sample
    ///
    /// # Returns
    /// * `Ok(())` - Every axis is finite
    /// * `Err(CalibrationError::NonFiniteSample)` - First offending axis, in x/y/z order
    pub fn validate(sample: &AxisTriple) -> Result<(), CalibrationError> {
        for (axis, value) in sample.labelled() {
            if !value.is_finite() {
                return Err(CalibrationError::NonFiniteSample { axis, value });
            }
        }
        Ok(())
    }
}
