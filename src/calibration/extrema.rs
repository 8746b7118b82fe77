// Running per-axis extrema for a verification session

use crate::sensor::AxisTriple;

/// Observed range of a single axis in g
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Widen the range to include `value`
    ///
    /// Comparisons are written so a NaN sample never replaces a bound.
    pub fn widen(&mut self, value: f32) {
        if value > self.max {
            self.max = value;
        }
        if value < self.min {
            self.min = value;
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Running minimum and maximum on each axis
///
/// Both bounds start at 0 rather than at the first sample. An axis that never
/// reads negative during the rotation therefore reports a minimum of exactly 0
/// instead of "undetermined"; the evaluator then scores that bound 1g away
/// from the expected -1g.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ExtremaState {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl ExtremaState {
    /// All bounds at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges(x: AxisRange, y: AxisRange, z: AxisRange) -> Self {
        Self { x, y, z }
    }

    /// Fold one sample into the extrema, returning the widened state
    pub fn updated(mut self, sample: &AxisTriple) -> Self {
        self.update(sample);
        self
    }

    /// Fold one sample into the extrema in place
    pub fn update(&mut self, sample: &AxisTriple) {
        self.x.widen(sample.x);
        self.y.widen(sample.y);
        self.z.widen(sample.z);
    }

    /// Ranges paired with their axis labels, in x/y/z order
    pub fn axes(&self) -> [(char, AxisRange); 3] {
        [('x', self.x), ('y', self.y), ('z', self.z)]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_samples() -> Vec<AxisTriple> {
        vec![
            AxisTriple::new(0.98, 0.02, 0.01),
            AxisTriple::new(-0.02, 1.01, 0.03),
            AxisTriple::new(0.01, -0.02, -0.99),
            AxisTriple::new(0.00, 0.00, 0.97),
            AxisTriple::new(-1.03, 0.4, -0.2),
            AxisTriple::new(0.3, -0.97, 0.5),
        ]
    }

    #[test]
    fn test_new_is_zero_seeded() {
        let extrema = ExtremaState::new();
        for (_, range) in extrema.axes() {
            assert_eq!(range, AxisRange::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_update_tracks_extremes() {
        let mut extrema = ExtremaState::new();
        for sample in create_test_samples().iter().take(4) {
            extrema.update(sample);
        }
        assert_eq!(extrema.x, AxisRange::new(-0.02, 0.98));
        assert_eq!(extrema.y, AxisRange::new(-0.02, 1.01));
        assert_eq!(extrema.z, AxisRange::new(-0.99, 0.97));
    }

    #[test]
    fn test_monotonic_widening() {
        let mut extrema = ExtremaState::new();
        for sample in create_test_samples() {
            let next = extrema.updated(&sample);
            for ((_, before), (_, after)) in extrema.axes().iter().zip(next.axes().iter()) {
                assert!(after.max >= before.max);
                assert!(after.min <= before.min);
            }
            extrema = next;
        }
    }

    #[test]
    fn test_order_independence() {
        let samples = create_test_samples();
        let forward = samples
            .iter()
            .fold(ExtremaState::new(), |acc, s| acc.updated(s));
        let reverse = samples
            .iter()
            .rev()
            .fold(ExtremaState::new(), |acc, s| acc.updated(s));

        let mut rotated = samples.clone();
        rotated.rotate_left(2);
        let rotated = rotated
            .iter()
            .fold(ExtremaState::new(), |acc, s| acc.updated(s));

        assert_eq!(forward, reverse);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_one_sided_axis_keeps_zero_bound() {
        let mut extrema = ExtremaState::new();
        extrema.update(&AxisTriple::new(0.5, 0.8, 1.0));
        extrema.update(&AxisTriple::new(0.7, 0.9, 1.02));
        assert_eq!(extrema.z, AxisRange::new(0.0, 1.02));
        assert_eq!(extrema.x.min, 0.0);
    }

    #[test]
    fn test_nan_does_not_replace_bounds() {
        let mut extrema = ExtremaState::new();
        extrema.update(&AxisTriple::new(1.0, -1.0, 0.5));
        extrema.update(&AxisTriple::new(f32::NAN, f32::NAN, f32::NAN));
        assert_eq!(extrema.x, AxisRange::new(0.0, 1.0));
        assert_eq!(extrema.y, AxisRange::new(-1.0, 0.0));
    }

    #[test]
    fn test_reset_and_span() {
        let mut extrema = ExtremaState::new();
        extrema.update(&AxisTriple::new(1.0, -1.0, 0.5));
        assert!((extrema.y.span() - 1.0).abs() < f32::EPSILON);
        extrema.reset();
        assert_eq!(extrema, ExtremaState::new());
    }
}
