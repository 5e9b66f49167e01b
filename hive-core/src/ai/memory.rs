//! Alpha-beta with memory: fail-soft negamax over a transposition table,
//! optionally ordered by killer moves. Driven by [`IddfsAI`] with a full
//! window and by [`MtdfAI`] with zero windows.
//!
//! [`IddfsAI`]: crate::ai::IddfsAI
//! [`MtdfAI`]: crate::ai::MtdfAI

use crate::ai::killers::KillerMoves;
use crate::ai::search::SearchBase;
use crate::ai::tt::{NodeType, TranspositionTable, TtEntry};
use crate::error::HiveError;
use crate::eval::MIN_VALUE;
use crate::game::{GameCommand, GameState};

pub(crate) struct MemorySearch<'a> {
    pub base: &'a mut SearchBase,
    pub tt: &'a mut TranspositionTable,
    pub killers: Option<&'a mut KillerMoves>,
}

impl MemorySearch<'_> {
    /// Search the root with window `(alpha, beta)`. The value is from the
    /// maximizing color's side; the move is `None` only if the clock ran
    /// out before the first child finished.
    pub fn root(
        &mut self,
        state: &mut GameState,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> Result<(i32, Option<GameCommand>), HiveError> {
        let key = state.zobrist_key();
        let tt_move = self.tt.probe(key).and_then(|e| e.best_move);
        let priority = self.priority(tt_move, depth);
        let commands = self.base.commands(state, &priority);

        let mut alpha = alpha;
        let window = (alpha, beta);
        let mut best = MIN_VALUE;
        let mut best_move = None;
        for (i, command) in commands.into_iter().enumerate() {
            let value = {
                let mut child = state.scoped(command)?;
                -self.search(&mut child, depth - 1, -beta, -alpha, -1)?
            };
            if self.base.clock.aborted() {
                break;
            }
            if best_move.is_none() || value > best {
                best = value;
                best_move = Some(command);
            }
            alpha = alpha.max(value);
            if alpha >= beta {
                self.base.stats.cutoff_after(i);
                self.record_killer(depth, command);
                break;
            }
        }

        if !self.base.clock.aborted() && best_move.is_some() {
            self.store(key, best, depth, window, best_move);
        }
        Ok((best, best_move))
    }

    fn search(
        &mut self,
        state: &mut GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        color: i32,
    ) -> Result<i32, HiveError> {
        if self.base.is_leaf(state, depth) {
            return Ok(color * self.base.value(state));
        }

        let key = state.zobrist_key();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best_move;
            if entry.depth >= depth {
                self.base.stats.cache_hits += 1;
                match entry.node_type {
                    NodeType::Pv => return Ok(entry.value),
                    NodeType::Cut => alpha = alpha.max(entry.value),
                    NodeType::All => beta = beta.min(entry.value),
                }
                if alpha >= beta {
                    return Ok(entry.value);
                }
            }
        }

        let window = (alpha, beta);
        let priority = self.priority(tt_move, depth);
        let commands = self.base.commands(state, &priority);
        let mut best = MIN_VALUE;
        let mut best_move = None;
        for (i, command) in commands.into_iter().enumerate() {
            let value = {
                let mut child = state.scoped(command)?;
                -self.search(&mut child, depth - 1, -beta, -alpha, -color)?
            };
            if best_move.is_none() || value > best {
                best = value;
                best_move = Some(command);
            }
            alpha = alpha.max(value);
            if alpha >= beta {
                self.base.stats.cutoff_after(i);
                self.record_killer(depth, command);
                break;
            }
        }

        // Values computed after the clock ran out are not trustworthy
        if !self.base.clock.aborted() {
            self.store(key, best, depth, window, best_move);
        }
        Ok(best)
    }

    fn store(&mut self, key: u64, value: i32, depth: u32, window: (i32, i32), best_move: Option<GameCommand>) {
        let node_type = NodeType::classify(value, window.0, window.1);
        self.tt.store(key, TtEntry { value, depth, node_type, best_move });
    }

    fn priority(&self, tt_move: Option<GameCommand>, depth: u32) -> Vec<GameCommand> {
        let mut priority: Vec<GameCommand> = tt_move.into_iter().collect();
        if let Some(killers) = self.killers.as_deref() {
            for command in killers.at(depth) {
                if !priority.contains(&command) {
                    priority.push(command);
                }
            }
        }
        priority
    }

    fn record_killer(&mut self, depth: u32, command: GameCommand) {
        if let Some(killers) = self.killers.as_deref_mut() {
            killers.record(depth, command);
        }
    }
}
