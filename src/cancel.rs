// Cancel inputs polled once per loop iteration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Non-blocking operator request to end the current loop
pub trait CancelSignal {
    /// `true` if cancellation was requested since the last poll
    fn poll_cancel(&mut self) -> bool;
}

impl<C: CancelSignal + ?Sized> CancelSignal for &mut C {
    fn poll_cancel(&mut self) -> bool {
        (**self).poll_cancel()
    }
}

/// Shared flag, typically set from a signal handler
///
/// Polling consumes the request, so the same flag can end a live readout and
/// later a verification session.
impl CancelSignal for Arc<AtomicBool> {
    fn poll_cancel(&mut self) -> bool {
        self.swap(false, Ordering::AcqRel)
    }
}

/// Never cancels; the loop must be bounded some other way
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn poll_cancel(&mut self) -> bool {
        false
    }
}

/// Cancels on the poll after `polls` polls have returned `false`
#[derive(Debug, Clone, Copy)]
pub struct CancelAfter {
    remaining: u64,
}

impl CancelAfter {
    pub fn new(polls: u64) -> Self {
        Self { remaining: polls }
    }
}

impl CancelSignal for CancelAfter {
    fn poll_cancel(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_after_counts_polls() {
        let mut cancel = CancelAfter::new(2);
        assert!(!cancel.poll_cancel());
        assert!(!cancel.poll_cancel());
        assert!(cancel.poll_cancel());
        assert!(cancel.poll_cancel());
    }

    #[test]
    fn test_cancel_after_zero_is_immediate() {
        assert!(CancelAfter::new(0).poll_cancel());
    }

    #[test]
    fn test_shared_flag_is_consumed() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut cancel = Arc::clone(&flag);
        assert!(!cancel.poll_cancel());

        flag.store(true, Ordering::Release);
        assert!(cancel.poll_cancel());
        assert!(!cancel.poll_cancel());
    }

    #[test]
    fn test_never_cancel() {
        let mut cancel = NeverCancel;
        for _ in 0..100 {
            assert!(!cancel.poll_cancel());
        }
    }
}
