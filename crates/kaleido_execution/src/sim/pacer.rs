use std::time::Duration;

use super::{Journal, SimEvent};
use crate::cancel::{CancelToken, Pacer};

/// Dwell that returns immediately, optionally cancelling after a number of
/// dwells.
#[derive(Debug, Clone)]
pub struct SimPacer {
    journal: Journal,
    dwells: usize,
    cancel_after: Option<usize>,
}

impl SimPacer {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            dwells: 0,
            cancel_after: None,
        }
    }

    /// Cancel the token once `n` dwells have been recorded.
    pub fn cancel_after(mut self, n: usize) -> Self {
        self.cancel_after = Some(n);
        self
    }

    pub fn dwells(&self) -> usize {
        self.dwells
    }
}

impl Pacer for SimPacer {
    fn dwell(&mut self, duration: Duration, cancel: &CancelToken) {
        self.journal.record(SimEvent::Dwell(duration));
        self.dwells += 1;
        if self.cancel_after.is_some_and(|n| self.dwells >= n) {
            cancel.cancel();
        }
    }
}
