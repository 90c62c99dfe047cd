use std::cell::RefCell;
use std::rc::Rc;

/// Identifies one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(pub u64);

/// Per-display-refresh callback scheduling.
///
/// `schedule_next` requests exactly one future frame; `cancel` retracts it.
/// The animation loop holds at most one outstanding token at a time, so a
/// stopped loop always leaves the scheduler with nothing pending.
pub trait FrameScheduler {
    fn schedule_next(&mut self) -> FrameToken;
    fn cancel(&mut self, token: FrameToken);
}

/// Manually stepped scheduler for tests and headless stepping.
///
/// Clones share state, so a test can keep one handle while the effect
/// instance owns another. `fire` plays the role of the display callback:
/// it consumes the pending token, after which the caller is expected to
/// drive the instance's `frame` entry point.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

#[derive(Debug, Default)]
struct ManualInner {
    next: u64,
    pending: Option<u64>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks currently scheduled (0 or 1).
    pub fn pending(&self) -> usize {
        usize::from(self.inner.borrow().pending.is_some())
    }

    /// Total cancellations observed.
    pub fn cancelled(&self) -> u64 {
        self.inner.borrow().cancelled
    }

    /// Delivers the pending callback, if any.
    pub fn fire(&self) -> Option<FrameToken> {
        self.inner.borrow_mut().pending.take().map(FrameToken)
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) -> FrameToken {
        let mut inner = self.inner.borrow_mut();
        inner.next += 1;
        inner.pending = Some(inner.next);
        FrameToken(inner.next)
    }

    fn cancel(&mut self, token: FrameToken) {
        let mut inner = self.inner.borrow_mut();
        if inner.pending == Some(token.0) {
            inner.pending = None;
            inner.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_then_fire_consumes_the_token() {
        let mut sched = ManualScheduler::new();
        let token = sched.schedule_next();
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.fire(), Some(token));
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.fire(), None);
    }

    #[test]
    fn cancel_retracts_only_the_matching_token() {
        let mut sched = ManualScheduler::new();
        let stale = sched.schedule_next();
        sched.fire();
        let live = sched.schedule_next();

        sched.cancel(stale);
        assert_eq!(sched.pending(), 1, "stale token must not cancel a newer frame");

        sched.cancel(live);
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.cancelled(), 1);
    }

    #[test]
    fn clones_share_pending_state() {
        let mut sched = ManualScheduler::new();
        let observer = sched.clone();
        sched.schedule_next();
        assert_eq!(observer.pending(), 1);
        observer.fire();
        assert_eq!(sched.pending(), 0);
    }
}
