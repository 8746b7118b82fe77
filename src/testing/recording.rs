use crate::calibration::{Orientation, SessionDisplay, SessionProgress, VerificationReport};
use crate::live::{LiveDisplay, LiveFrame};

/// Display that stores every render call for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub instructions: Vec<Vec<Orientation>>,
    pub prompts: Vec<SessionProgress>,
    pub reports: Vec<VerificationReport>,
    pub frames: Vec<LiveFrame>,
}

impl RecordingDisplay {
    /// Distinct prompts in the order they were first shown
    pub fn prompt_sequence(&self) -> Vec<Orientation> {
        let mut sequence: Vec<Orientation> = Vec::new();
        for progress in &self.prompts {
            if sequence.last() != Some(&progress.orientation) {
                sequence.push(progress.orientation);
            }
        }
        sequence
    }
}

impl SessionDisplay for RecordingDisplay {
    fn render_instructions(&mut self, poses: &[Orientation]) {
        self.instructions.push(poses.to_vec());
    }

    fn render_step_prompt(&mut self, progress: &SessionProgress) {
        self.prompts.push(progress.clone());
    }

    fn render_report(&mut self, report: &VerificationReport) {
        self.reports.push(report.clone());
    }
}

impl LiveDisplay for RecordingDisplay {
    fn render_live(&mut self, frame: &LiveFrame) {
        self.frames.push(*frame);
    }
}
