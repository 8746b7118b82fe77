//! Text rendering for terminals and log sinks.
//!
//! [`ConsoleDisplay`] implements both presentation traits over any
//! `io::Write`, so the CLI can point it at stdout, or at stderr when stdout
//! is reserved for JSON.

use std::io::{self, Write};

use crate::calibration::{Orientation, SessionDisplay, SessionProgress, VerificationReport};
use crate::live::{LiveDisplay, LiveFrame};

/// Heading of the instructions screen
pub const INSTRUCTIONS_TITLE: &str = "Accel Calibration Verify";

/// Default last line of the instructions screen
pub const DEFAULT_STOP_HINT: &str = "Press Ctrl-C when done";

/// Lines of the instructions screen: title, numbered poses, stop hint
pub fn instruction_lines(poses: &[Orientation], stop_hint: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(poses.len() + 3);
    lines.push(INSTRUCTIONS_TITLE.to_string());
    lines.push(format!("Place board in {} positions:", poses.len()));
    for (idx, pose) in poses.iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, pose.display_name()));
    }
    lines.push(stop_hint.to_string());
    lines
}

/// Plain-text display writing to an `io::Write` sink
pub struct ConsoleDisplay<W: Write> {
    out: W,
    last_prompt: Option<Orientation>,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl ConsoleDisplay<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_prompt: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            if let Err(err) = writeln!(self.out, "{}", line.as_ref()) {
                log::warn!("[ConsoleDisplay] Failed to write line: {}", err);
                return;
            }
        }
        if let Err(err) = self.out.flush() {
            log::warn!("[ConsoleDisplay] Failed to flush output: {}", err);
        }
    }
}

impl<W: Write> SessionDisplay for ConsoleDisplay<W> {
    fn render_instructions(&mut self, poses: &[Orientation]) {
        self.last_prompt = None;
        let lines = instruction_lines(poses, DEFAULT_STOP_HINT);
        self.write_lines(lines);
    }

    /// Writes the prompt only when the pose changes
    fn render_step_prompt(&mut self, progress: &SessionProgress) {
        if self.last_prompt == Some(progress.orientation) {
            return;
        }
        self.last_prompt = Some(progress.orientation);
        self.write_lines([progress.prompt()]);
    }

    fn render_report(&mut self, report: &VerificationReport) {
        self.write_lines(report.display_lines());
    }
}

impl<W: Write> LiveDisplay for ConsoleDisplay<W> {
    fn render_live(&mut self, frame: &LiveFrame) {
        let beat = if frame.heartbeat { "*" } else { " " };
        let line = format!("[{}] {}", beat, frame.lines().join("  "));
        self.write_lines([line]);
    }
}
