//! Wall-clock budget for one search

use std::time::{Duration, Instant};

/// Started when a search begins, read once per node. Once expired it stays
/// expired, and the search it belongs to counts as aborted.
#[derive(Clone, Copy, Debug)]
pub struct SearchClock {
    started: Instant,
    budget: Duration,
    aborted: bool,
}

impl SearchClock {
    pub fn start(budget: Duration) -> Self {
        Self { started: Instant::now(), budget, aborted: false }
    }

    /// True once the budget is used up
    pub fn expired(&mut self) -> bool {
        if !self.aborted && self.started.elapsed() >= self.budget {
            self.aborted = true;
        }
        self.aborted
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for SearchClock {
    fn default() -> Self {
        Self::start(Duration::MAX)
    }
}
