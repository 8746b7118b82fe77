// CalibrationSession - verification session state machine
//
// Idle -> Running -> Terminated. While running, every accepted sample widens
// the extrema and the orientation clock is re-evaluated. Terminating hands the
// terminal extrema to the evaluator and produces the one report of the
// session.

use crate::calibration::evaluation::RatingThresholds;
use crate::calibration::extrema::ExtremaState;
use crate::calibration::orientation::{Orientation, OrientationClock};
use crate::calibration::progress::{SessionProgress, SessionState};
use crate::calibration::report::VerificationReport;
use crate::calibration::validation::SampleValidator;
use crate::config::CalibrationConfig;
use crate::error::{log_calibration_error, CalibrationError};
use crate::sensor::AxisTriple;

/// One verification run: extrema, orientation clock and counters
pub struct CalibrationSession {
    config: CalibrationConfig,
    thresholds: RatingThresholds,
    state: SessionState,
    extrema: ExtremaState,
    clock: OrientationClock,
    started_at_ms: u64,
    samples_accepted: u64,
    samples_rejected: u64,
}

impl CalibrationSession {
    /// Create an idle session
    pub fn new(config: CalibrationConfig, thresholds: RatingThresholds) -> Self {
        let clock = OrientationClock::new(config.dwell_ms, 0);
        Self {
            config,
            thresholds,
            state: SessionState::Idle,
            extrema: ExtremaState::new(),
            clock,
            started_at_ms: 0,
            samples_accepted: 0,
            samples_rejected: 0,
        }
    }

    /// Create with default configuration (2000 ms dwell, 0.1/0.2/0.3 thresholds)
    pub fn new_default() -> Self {
        Self::new(CalibrationConfig::default(), RatingThresholds::default())
    }

    /// Begin sampling
    ///
    /// Resets the extrema to zero, the prompt to FaceUp and the dwell
    /// reference to `now_ms`.
    ///
    /// # Errors
    /// - `AlreadyRunning` if the session is running
    /// - `AlreadyTerminated` if the session has produced its report
    pub fn start(&mut self, now_ms: u64) -> Result<(), CalibrationError> {
        let err = match self.state {
            SessionState::Idle => None,
            SessionState::Running => Some(CalibrationError::AlreadyRunning),
            SessionState::Terminated => Some(CalibrationError::AlreadyTerminated),
        };
        if let Some(err) = err {
            log_calibration_error(&err, "start");
            return Err(err);
        }

        self.extrema.reset();
        self.clock.reset(now_ms);
        self.started_at_ms = now_ms;
        self.samples_accepted = 0;
        self.samples_rejected = 0;
        self.state = SessionState::Running;

        tracing::info!(
            "[CalibrationSession] Started at {} ms (dwell {} ms, prompt {:?})",
            now_ms,
            self.config.dwell_ms,
            self.clock.current()
        );
        Ok(())
    }

    /// Fold one sample into the session, then re-evaluate the orientation clock
    ///
    /// Non-finite samples are dropped and counted when
    /// `reject_non_finite` is set; the clock is evaluated either way.
    ///
    /// # Returns
    /// * `Ok(Orientation)` - Pose to prompt after this sample
    /// * `Err(CalibrationError::NotRunning)` - Session is idle or terminated
    pub fn record_sample(
        &mut self,
        sample: &AxisTriple,
        now_ms: u64,
    ) -> Result<Orientation, CalibrationError> {
        self.ensure_running()
            .inspect_err(|err| log_calibration_error(err, "record_sample"))?;

        let validation = if self.config.reject_non_finite {
            SampleValidator::validate(sample)
        } else {
            Ok(())
        };

        match validation {
            Ok(()) => {
                self.extrema.update(sample);
                self.samples_accepted += 1;
            }
            Err(err) => {
                self.samples_rejected += 1;
                tracing::warn!("[CalibrationSession] Sample rejected: {}", err);
            }
        }

        if self.clock.evaluate(now_ms) {
            tracing::debug!(
                "[CalibrationSession] Prompt advanced to {:?} at {} ms",
                self.clock.current(),
                now_ms
            );
        }

        Ok(self.clock.current())
    }

    /// Stop sampling and produce the session report
    ///
    /// Legal at any point while running, including before any sample.
    ///
    /// # Errors
    /// - `NotRunning` if the session never started
    /// - `AlreadyTerminated` on a second call
    pub fn terminate(&mut self, now_ms: u64) -> Result<VerificationReport, CalibrationError> {
        match self.state {
            SessionState::Running => {}
            SessionState::Idle => {
                let err = CalibrationError::NotRunning;
                log_calibration_error(&err, "terminate");
                return Err(err);
            }
            SessionState::Terminated => {
                let err = CalibrationError::AlreadyTerminated;
                log_calibration_error(&err, "terminate");
                return Err(err);
            }
        }

        self.state = SessionState::Terminated;
        let report = VerificationReport::new(
            self.extrema,
            &self.thresholds,
            self.samples_accepted,
            self.samples_rejected,
            self.clock.advances(),
            now_ms.saturating_sub(self.started_at_ms),
        );

        tracing::info!(
            "[CalibrationSession] Terminated after {} samples ({} rejected): overall error {:.3}, {:?}",
            report.samples_accepted,
            report.samples_rejected,
            report.metrics.overall,
            report.rating
        );
        Ok(report)
    }

    /// Snapshot for the display
    pub fn progress(&self, now_ms: u64) -> SessionProgress {
        SessionProgress {
            orientation: self.clock.current(),
            elapsed_ms: self.elapsed_ms(now_ms),
            remaining_in_step_ms: self.clock.remaining_ms(now_ms),
            steps_advanced: self.clock.advances(),
            samples_accepted: self.samples_accepted,
            samples_rejected: self.samples_rejected,
            extrema: self.extrema,
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn extrema(&self) -> &ExtremaState {
        &self.extrema
    }

    pub fn orientation(&self) -> Orientation {
        self.clock.current()
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    fn ensure_running(&self) -> Result<(), CalibrationError> {
        match self.state {
            SessionState::Running => Ok(()),
            SessionState::Idle | SessionState::Terminated => Err(CalibrationError::NotRunning),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
