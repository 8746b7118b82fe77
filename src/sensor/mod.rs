//! Accelerometer sample types and the sample-source abstraction.
//!
//! Register access and bus plumbing live outside this crate. The engine only
//! sees [`SampleSource`], which hands back one [`SensorReading`] per call.

use serde::{Deserialize, Serialize};

pub mod fixtures;

pub use fixtures::{
    FixtureSource, FixtureSpec, ScriptedSource, SyntheticRotationSource, SyntheticSpec,
};

/// Three axis values in g (1g ≈ standard gravity).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisTriple {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisTriple {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Axis values paired with their labels, in x/y/z order.
    pub fn labelled(&self) -> [(char, f32); 3] {
        [('x', self.x), ('y', self.y), ('z', self.z)]
    }

    /// Euclidean norm in g.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One accelerometer reading with tilt angles derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub accel: AxisTriple,
    /// Pitch in degrees
    pub pitch: f32,
    /// Roll in degrees
    pub roll: f32,
}

impl SensorReading {
    /// Build a reading from raw axes, deriving pitch and roll from gravity.
    pub fn from_accel(accel: AxisTriple) -> Self {
        let roll = accel.y.atan2(accel.z).to_degrees();
        let pitch = (-accel.x)
            .atan2((accel.y * accel.y + accel.z * accel.z).sqrt())
            .to_degrees();
        Self { accel, pitch, roll }
    }
}

/// Source of accelerometer readings.
///
/// Reads are synchronous and always succeed from the engine's point of view;
/// hardware faults must be resolved before a reading reaches this trait.
pub trait SampleSource {
    fn read_sample(&mut self) -> SensorReading;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn read_sample(&mut self) -> SensorReading {
        (**self).read_sample()
    }
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn read_sample(&mut self) -> SensorReading {
        (**self).read_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_reading_flat_has_zero_tilt() {
        let reading = SensorReading::from_accel(AxisTriple::new(0.0, 0.0, 1.0));
        assert!(approx(reading.pitch, 0.0));
        assert!(approx(reading.roll, 0.0));
    }

    #[test]
    fn test_reading_side_up_rolls_ninety() {
        let reading = SensorReading::from_accel(AxisTriple::new(0.0, 1.0, 0.0));
        assert!(approx(reading.roll, 90.0));
        assert!(approx(reading.pitch, 0.0));
    }

    #[test]
    fn test_reading_nose_down_pitches() {
        let reading = SensorReading::from_accel(AxisTriple::new(-1.0, 0.0, 0.0));
        assert!(approx(reading.pitch, 90.0));
    }

    #[test]
    fn test_magnitude() {
        assert!(approx(AxisTriple::new(0.6, 0.0, 0.8).magnitude(), 1.0));
    }
}
