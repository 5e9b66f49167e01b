//! Minimax with alpha-beta pruning

use std::sync::Arc;
use std::time::Duration;

use crate::ai::movegen::MoveGenerator;
use crate::ai::search::SearchBase;
use crate::ai::stats::AiStats;
use crate::ai::HiveAI;
use crate::error::HiveError;
use crate::eval::{Heuristic, MAX_VALUE, MIN_VALUE};
use crate::game::{GameCommand, GameState};

/// Alpha-beta over separate max and min levels. The first root move with
/// the best value wins.
#[derive(Clone)]
pub struct AlphaBetaAI {
    base: SearchBase,
}

impl AlphaBetaAI {
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

    pub fn last_value(&self) -> Option<i32> {
        self.base.last_value
    }

    fn alphabeta(
        &mut self,
        state: &mut GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32, HiveError> {
        if self.base.is_leaf(state, depth) {
            return Ok(self.base.value(state));
        }
        let commands = self.base.commands(state, &[]);

        if maximizing {
            let mut value = i32::MIN;
            for (i, command) in commands.into_iter().enumerate() {
                let child_value = {
                    let mut child = state.scoped(command)?;
                    self.alphabeta(&mut child, depth - 1, alpha, beta, false)?
                };
                value = value.max(child_value);
                alpha = alpha.max(value);
                if alpha >= beta {
                    self.base.stats.cutoff_after(i);
                    break;
                }
            }
            Ok(value)
        } else {
            let mut value = i32::MAX;
            for (i, command) in commands.into_iter().enumerate() {
                let child_value = {
                    let mut child = state.scoped(command)?;
                    self.alphabeta(&mut child, depth - 1, alpha, beta, true)?
                };
                value = value.min(child_value);
                beta = beta.min(value);
                if alpha >= beta {
                    self.base.stats.cutoff_after(i);
                    break;
                }
            }
            Ok(value)
        }
    }
}

impl HiveAI for AlphaBetaAI {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        self.base.begin(state);
        let commands = self.base.commands(state, &[]);

        let mut alpha = MIN_VALUE;
        let mut best: Option<(i32, GameCommand)> = None;
        for command in commands {
            let value = {
                let mut child = state.scoped(command)?;
                self.alphabeta(&mut child, self.base.depth - 1, alpha, MAX_VALUE, false)?
            };
            if best.map_or(true, |(v, _)| value > v) {
                best = Some((value, command));
                alpha = alpha.max(value);
            }
        }

        self.base.last_value = best.map(|(v, _)| v);
        Ok(best.map_or(GameCommand::Pass, |(_, c)| c))
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
