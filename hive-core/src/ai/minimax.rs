//! Plain minimax

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;

use crate::ai::movegen::MoveGenerator;
use crate::ai::search::SearchBase;
use crate::ai::stats::AiStats;
use crate::ai::HiveAI;
use crate::error::HiveError;
use crate::eval::Heuristic;
use crate::game::{GameCommand, GameState};

/// Full-width minimax. Equal best values at the root are broken at random.
#[derive(Clone)]
pub struct MinimaxAI {
    base: SearchBase,
}

impl MinimaxAI {
    pub fn new(name: impl Into<String>, heuristic: Arc<dyn Heuristic>, depth: u32, time_limit: Duration) -> Self {
        Self { base: SearchBase::new(name.into(), heuristic, depth, time_limit) }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base = self.base.with_seed(seed);
        self
    }

    pub fn with_generator(mut self, generator: MoveGenerator) -> Self {
        self.base = self.base.with_generator(generator);
        self
    }

    /// Root value of the last search, for the side that moved
    pub fn last_value(&self) -> Option<i32> {
        self.base.last_value
    }

    fn minimax(&mut self, state: &mut GameState, depth: u32, maximizing: bool) -> Result<i32, HiveError> {
        if self.base.is_leaf(state, depth) {
            return Ok(self.base.value(state));
        }
        let commands = self.base.commands(state, &[]);
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for command in commands {
            let value = {
                let mut child = state.scoped(command)?;
                self.minimax(&mut child, depth - 1, !maximizing)?
            };
            best = if maximizing { best.max(value) } else { best.min(value) };
        }
        Ok(best)
    }
}

impl HiveAI for MinimaxAI {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        self.base.begin(state);
        let commands = self.base.commands(state, &[]);

        let mut best_value = i32::MIN;
        let mut best = Vec::new();
        for command in commands {
            let value = {
                let mut child = state.scoped(command)?;
                self.minimax(&mut child, self.base.depth - 1, false)?
            };
            if value > best_value {
                best_value = value;
                best.clear();
            }
            if value == best_value {
                best.push(command);
            }
        }

        self.base.last_value = Some(best_value);
        Ok(best.choose(&mut self.base.rng).copied().unwrap_or(GameCommand::Pass))
    }

    fn stats(&self) -> &AiStats {
        &self.base.stats
    }

    fn stats_mut(&mut self) -> &mut AiStats {
        &mut self.base.stats
    }

    fn copy(&self) -> Box<dyn HiveAI> {
        Box::new(Self { base: self.base.fresh() })
    }
}
