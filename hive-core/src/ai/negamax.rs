//! Negamax with an alpha-beta window

use std::sync::Arc;
use std::time::Duration;

use crate::ai::movegen::MoveGenerator;
use crate::ai::search::SearchBase;
use crate::ai::stats::AiStats;
use crate::ai::HiveAI;
use crate::error::HiveError;
use crate::eval::{Heuristic, MAX_VALUE, MIN_VALUE};
use crate::game::{GameCommand, GameState};

#[derive(Clone)]
pub struct NegamaxAI {
    base: SearchBase,
}

impl NegamaxAI {
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

    /// `color` is +1 when the maximizing side is to move, -1 otherwise
    fn negamax(
        &mut self,
        state: &mut GameState,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        color: i32,
    ) -> Result<i32, HiveError> {
        if self.base.is_leaf(state, depth) {
            return Ok(color * self.base.value(state));
        }
        let commands = self.base.commands(state, &[]);
        let mut best = MIN_VALUE;
        for (i, command) in commands.into_iter().enumerate() {
            let value = {
                let mut child = state.scoped(command)?;
                -self.negamax(&mut child, depth - 1, -beta, -alpha, -color)?
            };
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                self.base.stats.cutoff_after(i);
                break;
            }
        }
        Ok(best)
    }
}

impl HiveAI for NegamaxAI {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        self.base.begin(state);
        let commands = self.base.commands(state, &[]);

        let mut alpha = MIN_VALUE;
        let mut best = None;
        for command in commands {
            let value = {
                let mut child = state.scoped(command)?;
                -self.negamax(&mut child, self.base.depth - 1, -MAX_VALUE, -alpha, -1)?
            };
            if best.is_none() || value > alpha {
                alpha = value;
                best = Some(command);
            }
        }

        self.base.last_value = Some(alpha);
        Ok(best.unwrap_or(GameCommand::Pass))
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
