//! Fixture descriptions + sample source implementations for hardware-free runs.
//!
//! The verification engine only needs something that implements
//! [`SampleSource`]. Field units talk to a real accelerometer; the CLI and the
//! test suite use the deterministic sources defined here instead:
//! a scripted replay of recorded readings, and a synthetic six-pose rotation
//! with configurable gain error, offset and noise.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::calibration::Orientation;
use crate::error::{log_sensor_error, SensorError};
use crate::sensor::{AxisTriple, SampleSource, SensorReading};

/// Largest synthetic noise amplitude accepted, matching a 16 g full-scale range.
pub const MAX_NOISE_G: f32 = 16.0;

/// Declarative description of a runnable sample fixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureSpec {
    pub id: String,
    pub source: FixtureSource,
    /// Number of passes over a scripted recording before holding the last sample
    #[serde(default = "default_loop_count")]
    pub loop_count: u16,
}

/// Sample source definition for fixture playback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixtureSource {
    /// Replay recorded readings in order.
    Scripted { samples: Vec<AxisTriple> },
    /// Generate a six-pose rotation procedurally.
    Synthetic(SyntheticSpec),
}

/// Configuration for synthetic rotation fixtures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticSpec {
    /// Relative scale error applied to gravity (0.05 = reads 1.05g)
    #[serde(default)]
    pub gain_error: f32,
    /// Constant bias added to every reading, in g
    #[serde(default)]
    pub offset: AxisTriple,
    /// Peak amplitude of uniform noise, in g
    #[serde(default)]
    pub noise: f32,
    /// Readings produced before moving to the next pose
    #[serde(default = "default_samples_per_pose")]
    pub samples_per_pose: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            gain_error: 0.0,
            offset: AxisTriple::default(),
            noise: 0.0,
            samples_per_pose: default_samples_per_pose(),
            seed: default_seed(),
        }
    }
}

impl FixtureSpec {
    /// Load a fixture description from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SensorError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|_| {
            let err = SensorError::FixtureNotFound {
                path: path.display().to_string(),
            };
            log_sensor_error(&err, "load_from_file");
            err
        })?;
        let spec: FixtureSpec = serde_json::from_str(&contents).map_err(|err| {
            let err = SensorError::InvalidFixture {
                reason: format!("{}: {}", path.display(), err),
            };
            log_sensor_error(&err, "load_from_file");
            err
        })?;
        spec.validate().inspect_err(|err| log_sensor_error(err, "load_from_file"))?;
        log::info!("[Fixtures] Loaded fixture '{}' from {:?}", spec.id, path);
        Ok(spec)
    }

    /// Validate invariant expectations before building a source.
    pub fn validate(&self) -> Result<(), SensorError> {
        match &self.source {
            FixtureSource::Scripted { samples } => {
                if samples.is_empty() {
                    return Err(SensorError::EmptyFixture {
                        id: self.id.clone(),
                    });
                }
            }
            FixtureSource::Synthetic(spec) => {
                if spec.samples_per_pose == 0 {
                    return Err(SensorError::InvalidFixture {
                        reason: "samples_per_pose must be > 0".to_string(),
                    });
                }
                if !(0.0..=MAX_NOISE_G).contains(&spec.noise) {
                    return Err(SensorError::InvalidFixture {
                        reason: format!(
                            "noise {} must be between 0 and {} g",
                            spec.noise, MAX_NOISE_G
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Convert the description into a runtime sample source.
    pub fn build_source(&self) -> Result<Box<dyn SampleSource + Send>, SensorError> {
        self.validate()
            .inspect_err(|err| log_sensor_error(err, "build_source"))?;
        match &self.source {
            FixtureSource::Scripted { samples } => Ok(Box::new(ScriptedSource::new(
                samples.clone(),
                normalized_loop_count(self.loop_count),
            )?)),
            FixtureSource::Synthetic(spec) => {
                Ok(Box::new(SyntheticRotationSource::new(spec.clone())))
            }
        }
    }
}

fn normalized_loop_count(loop_count: u16) -> u16 {
    if loop_count == 0 {
        1
    } else {
        loop_count
    }
}

fn default_loop_count() -> u16 {
    1
}

fn default_samples_per_pose() -> u32 {
    40
}

fn default_seed() -> u64 {
    0x5A5A_FFF0
}

/// Replays a fixed list of readings, then holds the final one.
pub struct ScriptedSource {
    samples: Vec<AxisTriple>,
    cursor: usize,
    loop_count: u16,
    loops_completed: u16,
}

impl ScriptedSource {
    pub fn new(samples: Vec<AxisTriple>, loop_count: u16) -> Result<Self, SensorError> {
        if samples.is_empty() {
            return Err(SensorError::EmptyFixture {
                id: "scripted".to_string(),
            });
        }
        Ok(Self {
            samples,
            cursor: 0,
            loop_count: normalized_loop_count(loop_count),
            loops_completed: 0,
        })
    }

    /// Whether every configured pass has been replayed.
    pub fn is_exhausted(&self) -> bool {
        self.loops_completed >= self.loop_count
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.loops_completed = 0;
    }
}

impl SampleSource for ScriptedSource {
    fn read_sample(&mut self) -> SensorReading {
        if self.is_exhausted() {
            let last = self.samples[self.samples.len() - 1];
            return SensorReading::from_accel(last);
        }

        let sample = self.samples[self.cursor];
        self.cursor += 1;
        if self.cursor >= self.samples.len() {
            self.cursor = 0;
            self.loops_completed += 1;
        }
        SensorReading::from_accel(sample)
    }
}

/// Walks through the six verification poses, reading gravity with the
/// configured gain error, offset and noise.
pub struct SyntheticRotationSource {
    spec: SyntheticSpec,
    rng: StdRng,
    pose: Orientation,
    reads_in_pose: u32,
}

impl SyntheticRotationSource {
    pub fn new(spec: SyntheticSpec) -> Self {
        Self {
            rng: StdRng::seed_from_u64(spec.seed),
            pose: Orientation::FaceUp,
            reads_in_pose: 0,
            spec: SyntheticSpec {
                samples_per_pose: spec.samples_per_pose.max(1),
                ..spec
            },
        }
    }

    /// Pose the next reading will be taken in.
    pub fn current_pose(&self) -> Orientation {
        self.pose
    }

    fn jitter(&mut self) -> f32 {
        if self.spec.noise <= 0.0 {
            0.0
        } else {
            self.rng.gen_range(-self.spec.noise..self.spec.noise)
        }
    }
}

impl SampleSource for SyntheticRotationSource {
    fn read_sample(&mut self) -> SensorReading {
        let gravity = self.pose.gravity();
        let scale = 1.0 + self.spec.gain_error;
        let offset = self.spec.offset;
        let accel = AxisTriple::new(
            gravity.x * scale + offset.x + self.jitter(),
            gravity.y * scale + offset.y + self.jitter(),
            gravity.z * scale + offset.z + self.jitter(),
        );

        self.reads_in_pose += 1;
        if self.reads_in_pose >= self.spec.samples_per_pose {
            self.reads_in_pose = 0;
            self.pose = self.pose.next();
        }

        SensorReading::from_accel(accel)
    }
}
