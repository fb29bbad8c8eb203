//! Cancellation and dwell pacing.
//!
//! The engine checks its [`CancelToken`] only at safe points: before and
//! after each dwell and between pick-and-turns. A pick-and-turn that has
//! started always runs to completion (or to a fault) so the gripper is never
//! left holding a tile.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

/// Cloneable cancellation flag shared between the engine and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Wakes any dwell in progress.
    pub fn cancel(&self) {
        let mut cancelled = self.state.cancelled.lock();
        *cancelled = true;
        self.state.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.cancelled.lock()
    }

    /// Block for up to `timeout`, returning early if cancelled.
    ///
    /// Returns `true` if the token was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.state.cancelled.lock();
        while !*cancelled {
            if self.state.signal.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

/// The blocking pause between stages.
pub trait Pacer {
    fn dwell(&mut self, duration: Duration, cancel: &CancelToken);
}

/// Sleeps for the dwell, waking early on cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingPacer;

impl Pacer for BlockingPacer {
    fn dwell(&mut self, duration: Duration, cancel: &CancelToken) {
        cancel.wait_timeout(duration);
    }
}
