//! MTD(f)

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

/// Converges on the minimax value with zero-window searches, re-using the
/// transposition table between passes. Deepens iteratively, seeding each
/// depth with the previous value.
#[derive(Clone)]
pub struct MtdfAI {
    base: SearchBase,
    tt: TranspositionTable,
    killers: KillerMoves,
}

impl MtdfAI {
    pub fn new(name: impl Into<String>, heuristic: Arc<dyn Heuristic>, depth: u32, time_limit: Duration) -> Self {
        Self {
            base: SearchBase::new(name.into(), heuristic, depth, time_limit),
            tt: TranspositionTable::new(),
            killers: KillerMoves::new(),
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

    pub fn last_value(&self) -> Option<i32> {
        self.base.last_value
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Cutoff moves collected during the last search
    pub fn killers(&self) -> &KillerMoves {
        &self.killers
    }

    /// One MTD(f) pass at a fixed depth
    fn mtdf(&mut self, state: &mut GameState, guess: i32, depth: u32) -> Result<(i32, Option<GameCommand>), HiveError> {
        let mut g = guess;
        let mut lower = MIN_VALUE;
        let mut upper = MAX_VALUE;
        let mut proven = None;
        let mut fallback = None;

        while lower < upper {
            let beta = if g == lower { g + 1 } else { g };
            let mut search = MemorySearch {
                base: &mut self.base,
                tt: &mut self.tt,
                killers: Some(&mut self.killers),
            };
            let (value, command) = search.root(state, depth, beta - 1, beta)?;
            if self.base.clock.aborted() {
                break;
            }
            g = value;
            if g < beta {
                upper = g;
                fallback = fallback.or(command);
            } else {
                lower = g;
                proven = command;
            }
        }
        Ok((g, proven.or(fallback)))
    }
}

impl HiveAI for MtdfAI {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        self.base.begin(state);
        self.tt.prepare(self.base.maximizing);
        self.killers.clear();

        let mut guess = 0;
        let mut best = None;
        for depth in 1..=self.base.depth {
            let (value, command) = self.mtdf(state, guess, depth)?;
            if self.base.clock.aborted() {
                debug!(ai = %self.base.name, depth, "depth aborted by the clock");
                break;
            }
            let Some(command) = command else {
                break;
            };
            debug!(ai = %self.base.name, depth, value, best = %command, "depth complete");
            guess = value;
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
            killers: KillerMoves::new(),
        })
    }
}
