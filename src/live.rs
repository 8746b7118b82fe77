// Live readout - periodic acc x/y/z and tilt display between sessions
//
// Polls the cancel input on a short cadence and refreshes the readout on a
// longer one. The heartbeat indicator flips once per frame and never reaches
// the verification engine.

use serde::Serialize;

use crate::cancel::CancelSignal;
use crate::clock::Clock;
use crate::config::LiveConfig;
use crate::sensor::{SampleSource, SensorReading};

/// One refresh of the live readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveFrame {
    /// Zero-based frame counter
    pub index: u64,
    /// Loop time the reading was taken at
    pub at_ms: u64,
    pub reading: SensorReading,
    /// Heartbeat indicator state for this frame
    pub heartbeat: bool,
}

impl LiveFrame {
    /// Readout lines: three axes in g, then pitch and roll in degrees, one decimal each
    pub fn lines(&self) -> [String; 5] {
        let accel = self.reading.accel;
        [
            format!("ACC_X : {:.1}", accel.x),
            format!("ACC_Y : {:.1}", accel.y),
            format!("ACC_Z : {:.1}", accel.z),
            format!("Pitch : {:.1}", self.reading.pitch),
            format!("Roll  : {:.1}", self.reading.roll),
        ]
    }
}

/// Presentation surface for the live readout
pub trait LiveDisplay {
    fn render_live(&mut self, frame: &LiveFrame);
}

impl<D: LiveDisplay + ?Sized> LiveDisplay for &mut D {
    fn render_live(&mut self, frame: &LiveFrame) {
        (**self).render_live(frame)
    }
}

/// Result of a live readout run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveSummary {
    pub frames: u64,
    pub polls: u64,
    /// `true` when the cancel input ended the run
    pub cancelled: bool,
    pub last_reading: Option<SensorReading>,
}

/// Drives the live readout against its collaborators
pub struct LiveMonitor<S, C, K, D> {
    config: LiveConfig,
    source: S,
    cancel: C,
    clock: K,
    display: D,
    heartbeat: bool,
}

impl<S, C, K, D> LiveMonitor<S, C, K, D>
where
    S: SampleSource,
    C: CancelSignal,
    K: Clock,
    D: LiveDisplay,
{
    pub fn new(config: LiveConfig, source: S, cancel: C, clock: K, display: D) -> Self {
        Self {
            config,
            source,
            cancel,
            clock,
            display,
            heartbeat: false,
        }
    }

    /// Refresh until cancelled, or until `max_frames` frames have been shown
    pub fn run(&mut self, max_frames: Option<u64>) -> LiveSummary {
        let poll_ms = self.config.poll_interval_ms.max(1);
        let refresh_ms = self.config.refresh_ms.max(1);

        let mut summary = LiveSummary {
            frames: 0,
            polls: 0,
            cancelled: false,
            last_reading: None,
        };
        let mut last_frame_ms = self.clock.now_ms();

        log::info!(
            "[LiveMonitor] Refreshing every {} ms (poll {} ms)",
            refresh_ms,
            poll_ms
        );

        loop {
            if max_frames.is_some_and(|max| summary.frames >= max) {
                break;
            }
            if self.cancel.poll_cancel() {
                summary.cancelled = true;
                break;
            }

            self.clock.pause(poll_ms);
            summary.polls += 1;

            let now_ms = self.clock.now_ms();
            if now_ms.saturating_sub(last_frame_ms) < refresh_ms {
                continue;
            }
            last_frame_ms = now_ms;

            let reading = self.source.read_sample();
            if self.config.heartbeat {
                self.heartbeat = !self.heartbeat;
            }
            let frame = LiveFrame {
                index: summary.frames,
                at_ms: now_ms,
                reading,
                heartbeat: self.heartbeat,
            };
            self.display.render_live(&frame);
            summary.frames += 1;
            summary.last_reading = Some(reading);
        }

        log::info!(
            "[LiveMonitor] Stopped after {} frames ({} polls, cancelled: {})",
            summary.frames,
            summary.polls,
            summary.cancelled
        );
        summary
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
