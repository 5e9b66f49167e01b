//! Iterative deepening over a transposition table

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::killers::KillerMoves;
use crate::ai::memory::MemorySearch;
use crate::ai::movegen::MoveGenerator;
use crate::ai::search::SearchBase;
use crate::ai::stats::AiStats;
use crate::ai::tt::TranspositionTable;
use crate::ai::HiveAI;
use crate::error::HiveError;
use crate::eval::{Heuristic, MAX_VALUE, MIN_VALUE};
use crate::game::{GameCommand, GameState};

/// Searches depth 1, 2, ... up to the configured depth while time remains.
/// Each finished depth replaces the chosen move; a depth cut short by the
/// clock is thrown away.
#[derive(Clone)]
pub struct IddfsAI {
    base: SearchBase,
    tt: TranspositionTable,
    killers: Option<KillerMoves>,
}

impl IddfsAI {
    pub fn new(name: impl Into<String>, heuristic: Arc<dyn Heuristic>, depth: u32, time_limit: Duration) -> Self {
        Self {
            base: SearchBase::new(name.into(), heuristic, depth, time_limit),
            tt: TranspositionTable::new(),
            killers: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base = self.base.with_seed(seed);
        self
    }

    pub fn with_generator(mut self, generator: MoveGenerator) -> Self {
        self.base = self.base.with_generator(generator);
        self
    }

    /// Order moves that caused cutoffs at the same depth first
    pub fn with_killer_moves(mut self) -> Self {
        self.killers = Some(KillerMoves::new());
        self
    }

    pub fn last_value(&self) -> Option<i32> {
        self.base.last_value
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.tt
    }
}

impl HiveAI for IddfsAI {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        self.base.begin(state);
        self.tt.prepare(self.base.maximizing);
        if let Some(killers) = self.killers.as_mut() {
            killers.clear();
        }

        let mut best = None;
        for depth in 1..=self.base.depth {
            let mut search = MemorySearch {
                base: &mut self.base,
                tt: &mut self.tt,
                killers: self.killers.as_mut(),
            };
            let (value, command) = search.root(state, depth, MIN_VALUE, MAX_VALUE)?;
            if self.base.clock.aborted() {
                debug!(ai = %self.base.name, depth, "depth aborted by the clock");
                break;
            }
            let Some(command) = command else {
                break;
            };
            debug!(ai = %self.base.name, depth, value, best = %command, "depth complete");
            best = Some(command);
            self.base.last_value = Some(value);
            if value == MAX_VALUE {
                break;
            }
        }

        match best {
            Some(command) => Ok(command),
            None => {
                warn!(ai = %self.base.name, "no search depth completed, playing the first legal move");
                Ok(self.base.generator.generate(state).first().copied().unwrap_or(GameCommand::Pass))
            }
        }
    }

    fn stats(&self) -> &AiStats {
        &self.base.stats
    }

    fn stats_mut(&mut self) -> &mut AiStats {
        &mut self.base.stats
    }

    fn copy(&self) -> Box<dyn HiveAI> {
        Box::new(Self {
            base: self.base.fresh(),
            tt: TranspositionTable::new(),
            killers: self.killers.as_ref().map(|_| KillerMoves::new()),
        })
    }
}
