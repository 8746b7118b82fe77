//! Testability harness utilities.
//!
//! Hardware-free collaborators for driving the session and live loops from
//! unit tests, integration tests and the CLI's `--simulated` mode. Sample
//! sources live in [`crate::sensor::fixtures`]; this module holds the
//! recording display that captures everything a loop renders.

mod recording;

pub use recording::RecordingDisplay;
