// Progress snapshot handed to the display on every session iteration

use crate::calibration::extrema::ExtremaState;
use crate::calibration::orientation::Orientation;

/// Lifecycle state of a verification session
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SessionState {
    /// Created, not yet sampling
    Idle,
    /// Sampling and cycling orientation prompts
    Running,
    /// Cancelled; the report has been produced
    Terminated,
}

/// Progress information for the current session iteration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionProgress {
    /// Pose the operator should currently hold
    pub orientation: Orientation,
    /// Milliseconds since the session started
    pub elapsed_ms: u64,
    /// Milliseconds until the prompt may advance
    pub remaining_in_step_ms: u64,
    /// Number of times the prompt has advanced
    pub steps_advanced: u64,
    /// Samples folded into the extrema
    pub samples_accepted: u64,
    /// Samples dropped by validation
    pub samples_rejected: u64,
    /// Extrema observed so far
    pub extrema: ExtremaState,
}

impl SessionProgress {
    /// Prompt text for the current pose
    pub fn prompt(&self) -> String {
        self.orientation.prompt()
    }

    /// Whether every pose has been prompted at least once
    pub fn has_visited_all_poses(&self) -> bool {
        self.steps_advanced >= (Orientation::ALL.len() as u64 - 1)
    }

    /// Number of complete six-pose cycles
    pub fn cycles_completed(&self) -> u64 {
        self.steps_advanced / Orientation::ALL.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_progress(steps_advanced: u64) -> SessionProgress {
        SessionProgress {
            orientation: Orientation::from_step((steps_advanced % 6) as u8),
            elapsed_ms: steps_advanced * 2_050,
            remaining_in_step_ms: 2_000,
            steps_advanced,
            samples_accepted: steps_advanced * 41,
            samples_rejected: 0,
            extrema: ExtremaState::new(),
        }
    }

    #[test]
    fn test_progress_prompt() {
        assert_eq!(create_test_progress(0).prompt(), "Current: Face up");
        assert_eq!(create_test_progress(3).prompt(), "Current: Right side up");
    }

    #[test]
    fn test_progress_visited_all_poses() {
        assert!(!create_test_progress(4).has_visited_all_poses());
        assert!(create_test_progress(5).has_visited_all_poses());
    }

    #[test]
    fn test_progress_cycles_completed() {
        assert_eq!(create_test_progress(5).cycles_completed(), 0);
        assert_eq!(create_test_progress(6).cycles_completed(), 1);
        assert_eq!(create_test_progress(13).cycles_completed(), 2);
    }

    #[test]
    fn test_progress_serializes() {
        let json = serde_json::to_string(&create_test_progress(2)).unwrap();
        assert!(json.contains("\"orientation\":\"LeftSideUp\""));
        assert!(json.contains("\"steps_advanced\":2"));
    }
}
