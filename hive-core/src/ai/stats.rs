//! Per-AI search statistics

use std::time::Instant;

use serde::Serialize;

/// Counters collected while an AI searches. Kept across moves until
/// [`AiStats::reset`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct AiStats {
    /// Wall time of each move, in milliseconds
    move_times_ms: Vec<u64>,
    pub positions_evaluated: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
    /// Sum of the move indices at which cutoffs happened
    cutoff_index_total: u64,
    pub nodes_branched: u64,
    branches_total: u64,
    #[serde(skip)]
    timer: Option<Instant>,
}

impl AiStats {
    pub fn start_timer(&mut self) {
        self.timer = Some(Instant::now());
    }

    pub fn stop_timer(&mut self) {
        if let Some(started) = self.timer.take() {
            self.move_times_ms.push(started.elapsed().as_millis() as u64);
        }
    }

    pub fn move_times_ms(&self) -> &[u64] {
        &self.move_times_ms
    }

    pub fn moves(&self) -> usize {
        self.move_times_ms.len()
    }

    pub fn average_move_ms(&self) -> f64 {
        if self.move_times_ms.is_empty() {
            return 0.0;
        }
        self.move_times_ms.iter().sum::<u64>() as f64 / self.move_times_ms.len() as f64
    }

    pub fn max_move_ms(&self) -> u64 {
        self.move_times_ms.iter().copied().max().unwrap_or(0)
    }

    /// A beta cutoff after trying `index + 1` moves
    pub fn cutoff_after(&mut self, index: usize) {
        self.cutoffs += 1;
        self.cutoff_index_total += index as u64;
    }

    /// An interior node expanded with `children` moves
    pub fn node_branched(&mut self, children: usize) {
        self.nodes_branched += 1;
        self.branches_total += children as u64;
    }

    pub fn average_cutoff_index(&self) -> f64 {
        if self.cutoffs == 0 {
            return 0.0;
        }
        self.cutoff_index_total as f64 / self.cutoffs as f64
    }

    pub fn average_branching(&self) -> f64 {
        if self.nodes_branched == 0 {
            return 0.0;
        }
        self.branches_total as f64 / self.nodes_branched as f64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
