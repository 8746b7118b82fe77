// SessionRunner - cooperative verification loop
//
// Each iteration: cancel check, sample, tracker, clock, prompt, pause. The
// pause is the only suspension point, so it bounds cancel latency. On cancel
// the session terminates, the report is rendered once and the log record is
// emitted.

use crate::calibration::orientation::Orientation;
use crate::calibration::progress::SessionProgress;
use crate::calibration::report::VerificationReport;
use crate::calibration::session::CalibrationSession;
use crate::cancel::CancelSignal;
use crate::clock::Clock;
use crate::error::CalibrationError;
use crate::sensor::SampleSource;

/// Presentation surface for a verification session
pub trait SessionDisplay {
    /// Shown once before sampling begins
    fn render_instructions(&mut self, poses: &[Orientation]);

    /// Called every iteration with the current progress
    fn render_step_prompt(&mut self, progress: &SessionProgress);

    /// Called exactly once, after the session terminates
    fn render_report(&mut self, report: &VerificationReport);
}

impl<D: SessionDisplay + ?Sized> SessionDisplay for &mut D {
    fn render_instructions(&mut self, poses: &[Orientation]) {
        (**self).render_instructions(poses)
    }

    fn render_step_prompt(&mut self, progress: &SessionProgress) {
        (**self).render_step_prompt(progress)
    }

    fn render_report(&mut self, report: &VerificationReport) {
        (**self).render_report(report)
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StopReason {
    /// Operator requested it
    Cancelled,
    /// `max_duration_ms` elapsed
    DurationElapsed,
}

/// Drives a `CalibrationSession` against its collaborators
pub struct SessionRunner<S, C, K, D> {
    session: CalibrationSession,
    source: S,
    cancel: C,
    clock: K,
    display: D,
    iterations: u64,
    stop_reason: Option<StopReason>,
}

impl<S, C, K, D> SessionRunner<S, C, K, D>
where
    S: SampleSource,
    C: CancelSignal,
    K: Clock,
    D: SessionDisplay,
{
    pub fn new(session: CalibrationSession, source: S, cancel: C, clock: K, display: D) -> Self {
        Self {
            session,
            source,
            cancel,
            clock,
            display,
            iterations: 0,
            stop_reason: None,
        }
    }

    /// Run until cancelled (or the optional duration elapses)
    ///
    /// # Returns
    /// * `Ok(VerificationReport)` - The session's single report
    /// * `Err(CalibrationError)` - The session was not idle
    pub fn run(&mut self) -> Result<VerificationReport, CalibrationError> {
        self.display.render_instructions(&Orientation::ALL);
        self.session.start(self.clock.now_ms())?;

        let poll_interval_ms = self.session.config().poll_interval_ms;
        let max_duration_ms = self.session.config().max_duration_ms;

        let reason = loop {
            if self.cancel.poll_cancel() {
                break StopReason::Cancelled;
            }
            if let Some(limit) = max_duration_ms {
                if self.session.elapsed_ms(self.clock.now_ms()) >= limit {
                    break StopReason::DurationElapsed;
                }
            }

            let reading = self.source.read_sample();
            let now_ms = self.clock.now_ms();
            self.session.record_sample(&reading.accel, now_ms)?;
            self.display
                .render_step_prompt(&self.session.progress(now_ms));
            self.iterations += 1;

            self.clock.pause(poll_interval_ms);
        };

        tracing::info!(
            "[SessionRunner] Stopping after {} iterations ({:?})",
            self.iterations,
            reason
        );
        self.stop_reason = Some(reason);

        let report = self.session.terminate(self.clock.now_ms())?;
        self.display.render_report(&report);
        report.emit_log_record();
        Ok(report)
    }

    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Completed loop iterations
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Set once `run` has left its loop
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }
}
