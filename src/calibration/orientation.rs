// Orientation prompts and the dwell-driven step clock
//
// The operator is guided through six poses in a fixed order. The clock is a
// free-running modulo-6 counter: it advances one pose each time the dwell
// interval has been exceeded and never checks that the pose was reached.

use crate::sensor::AxisTriple;

/// Default time each pose prompt is shown before advancing (ms)
pub const DEFAULT_DWELL_MS: u64 = 2_000;

/// Pose the operator should currently hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Step 0: board flat, face up
    FaceUp,
    /// Step 1: board flat, face down
    FaceDown,
    /// Step 2: standing on its right edge, left side up
    LeftSideUp,
    /// Step 3: standing on its left edge, right side up
    RightSideUp,
    /// Step 4: standing on its bottom edge, top up
    TopUp,
    /// Step 5: standing on its top edge, bottom up
    BottomUp,
}

impl Orientation {
    /// All poses in prompt order
    pub const ALL: [Orientation; 6] = [
        Orientation::FaceUp,
        Orientation::FaceDown,
        Orientation::LeftSideUp,
        Orientation::RightSideUp,
        Orientation::TopUp,
        Orientation::BottomUp,
    ];

    /// Pose for a step index, wrapping past the last pose
    pub fn from_step(step: u8) -> Orientation {
        Self::ALL[step as usize % Self::ALL.len()]
    }

    /// Step index in [0, 5]
    pub fn step(&self) -> u8 {
        match self {
            Orientation::FaceUp => 0,
            Orientation::FaceDown => 1,
            Orientation::LeftSideUp => 2,
            Orientation::RightSideUp => 3,
            Orientation::TopUp => 4,
            Orientation::BottomUp => 5,
        }
    }

    /// Next pose in the cycle (BottomUp wraps to FaceUp)
    pub fn next(&self) -> Orientation {
        Self::from_step(self.step() + 1)
    }

    /// Get human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Orientation::FaceUp => "Face up",
            Orientation::FaceDown => "Face down",
            Orientation::LeftSideUp => "Left side up",
            Orientation::RightSideUp => "Right side up",
            Orientation::TopUp => "Top up",
            Orientation::BottomUp => "Bottom up",
        }
    }

    /// Prompt line shown while this pose is active
    pub fn prompt(&self) -> String {
        format!("Current: {}", self.display_name())
    }

    /// Ideal reading in g when this pose is held perfectly still
    ///
    /// Sensor frame: +z out of the face, +x towards the left edge,
    /// +y towards the top edge.
    pub fn gravity(&self) -> AxisTriple {
        match self {
            Orientation::FaceUp => AxisTriple::new(0.0, 0.0, 1.0),
            Orientation::FaceDown => AxisTriple::new(0.0, 0.0, -1.0),
            Orientation::LeftSideUp => AxisTriple::new(1.0, 0.0, 0.0),
            Orientation::RightSideUp => AxisTriple::new(-1.0, 0.0, 0.0),
            Orientation::TopUp => AxisTriple::new(0.0, 1.0, 0.0),
            Orientation::BottomUp => AxisTriple::new(0.0, -1.0, 0.0),
        }
    }
}

/// Wall-clock driven orientation step counter
#[derive(Debug, Clone)]
pub struct OrientationClock {
    dwell_ms: u64,
    current: Orientation,
    last_step_change_ms: u64,
    advances: u64,
}

impl OrientationClock {
    /// Create a clock starting at FaceUp with the dwell reference at `now_ms`
    pub fn new(dwell_ms: u64, now_ms: u64) -> Self {
        Self {
            dwell_ms,
            current: Orientation::FaceUp,
            last_step_change_ms: now_ms,
            advances: 0,
        }
    }

    /// Restart the cycle at FaceUp
    pub fn reset(&mut self, now_ms: u64) {
        self.current = Orientation::FaceUp;
        self.last_step_change_ms = now_ms;
        self.advances = 0;
    }

    /// Advance at most one step if more than the dwell interval has elapsed
    ///
    /// # Returns
    /// * `true` - The step advanced on this evaluation
    /// * `false` - Still within the dwell interval
    pub fn evaluate(&mut self, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_step_change_ms);
        if elapsed > self.dwell_ms {
            self.current = self.current.next();
            self.last_step_change_ms = now_ms;
            self.advances += 1;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Orientation {
        self.current
    }

    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }

    pub fn last_step_change_ms(&self) -> u64 {
        self.last_step_change_ms
    }

    /// Total number of advances since the last reset
    pub fn advances(&self) -> u64 {
        self.advances
    }

    /// Time left before the next advance becomes possible
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.last_step_change_ms);
        self.dwell_ms.saturating_sub(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_next_wraps() {
        assert_eq!(Orientation::FaceUp.next(), Orientation::FaceDown);
        assert_eq!(Orientation::TopUp.next(), Orientation::BottomUp);
        assert_eq!(Orientation::BottomUp.next(), Orientation::FaceUp);
    }

    #[test]
    fn test_orientation_step_roundtrip() {
        for (idx, pose) in Orientation::ALL.iter().enumerate() {
            assert_eq!(pose.step() as usize, idx);
            assert_eq!(Orientation::from_step(idx as u8), *pose);
        }
        assert_eq!(Orientation::from_step(6), Orientation::FaceUp);
    }

    #[test]
    fn test_orientation_prompt() {
        assert_eq!(Orientation::FaceUp.prompt(), "Current: Face up");
        assert_eq!(Orientation::LeftSideUp.prompt(), "Current: Left side up");
        assert_eq!(Orientation::BottomUp.prompt(), "Current: Bottom up");
    }

    #[test]
    fn test_each_axis_sees_both_directions() {
        let mut max = AxisTriple::default();
        let mut min = AxisTriple::default();
        for pose in Orientation::ALL {
            let g = pose.gravity();
            max = AxisTriple::new(max.x.max(g.x), max.y.max(g.y), max.z.max(g.z));
            min = AxisTriple::new(min.x.min(g.x), min.y.min(g.y), min.z.min(g.z));
        }
        assert_eq!(max, AxisTriple::new(1.0, 1.0, 1.0));
        assert_eq!(min, AxisTriple::new(-1.0, -1.0, -1.0));
    }

    #[test]
    fn test_clock_does_not_advance_at_exact_dwell() {
        let mut clock = OrientationClock::new(DEFAULT_DWELL_MS, 0);
        assert!(!clock.evaluate(2_000));
        assert_eq!(clock.current(), Orientation::FaceUp);
        assert!(clock.evaluate(2_001));
        assert_eq!(clock.current(), Orientation::FaceDown);
        assert_eq!(clock.last_step_change_ms(), 2_001);
    }

    #[test]
    fn test_clock_step_cycle_with_fine_polling() {
        // Evaluated every millisecond, the step at 2000k + 1000 is k mod 6
        let mut clock = OrientationClock::new(DEFAULT_DWELL_MS, 0);
        let mut now = 0u64;
        for k in 0..14u64 {
            let checkpoint = 2_000 * k + 1_000;
            while now < checkpoint {
                now += 1;
                clock.evaluate(now);
            }
            assert_eq!(clock.current().step() as u64, k % 6, "k = {}", k);
        }
    }

    #[test]
    fn test_clock_single_advance_per_evaluation() {
        let mut clock = OrientationClock::new(DEFAULT_DWELL_MS, 0);
        assert!(clock.evaluate(100_000));
        assert_eq!(clock.current(), Orientation::FaceDown);
        assert_eq!(clock.advances(), 1);

        // Reference moved to the evaluation time, so no immediate catch-up
        assert!(!clock.evaluate(100_050));
        assert_eq!(clock.current(), Orientation::FaceDown);
    }

    #[test]
    fn test_clock_ignores_time_going_backwards() {
        let mut clock = OrientationClock::new(DEFAULT_DWELL_MS, 10_000);
        assert!(!clock.evaluate(0));
        assert_eq!(clock.current(), Orientation::FaceUp);
    }

    #[test]
    fn test_clock_with_custom_dwell_and_reset() {
        let mut clock = OrientationClock::new(500, 1_000);
        assert!(clock.evaluate(1_501));
        assert!(clock.evaluate(2_002));
        assert_eq!(clock.current(), Orientation::LeftSideUp);
        assert_eq!(clock.remaining_ms(2_102), 400);

        clock.reset(5_000);
        assert_eq!(clock.current(), Orientation::FaceUp);
        assert_eq!(clock.advances(), 0);
        assert_eq!(clock.last_step_change_ms(), 5_000);
    }
}
