// Time sources for the session and live loops
//
// Loops never read the wall clock directly. `SystemClock` backs the CLI;
// `SimulatedClock` advances only when the loop pauses, which makes every
// run deterministic.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic millisecond time plus the inter-iteration pause
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;

    /// Suspend the loop for `ms` milliseconds
    fn pause(&mut self, ms: u64);
}

impl<K: Clock + ?Sized> Clock for &mut K {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn pause(&mut self, ms: u64) {
        (**self).pause(ms)
    }
}

/// Wall clock backed by `Instant`; pauses sleep the calling thread
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn pause(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Virtual clock: time moves only through `pause` and `advance`
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now_ms: u64,
    pauses: u64,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the virtual timeline at `now_ms`
    pub fn starting_at(now_ms: u64) -> Self {
        Self { now_ms, pauses: 0 }
    }

    /// Move time forward without counting a pause
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Number of pauses taken so far
    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}

impl Clock for SimulatedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn pause(&mut self, ms: u64) {
        self.advance(ms);
        self.pauses += 1;
    }
}
