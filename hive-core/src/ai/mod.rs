//! Computer players
//!
//! Every search runs on the caller's [`GameState`]: commands are applied with
//! [`GameState::scoped`] and undone when the guard drops, so a search leaves
//! the state exactly as it found it. Values are from the point of view of the
//! player the search is choosing a move for.

mod alphabeta;
mod clock;
mod iddfs;
mod killers;
mod memory;
mod minimax;
mod movegen;
mod mtdf;
mod negamax;
mod random;
mod search;
mod stats;
mod tt;

pub use alphabeta::AlphaBetaAI;
pub use clock::SearchClock;
pub use iddfs::IddfsAI;
pub use killers::KillerMoves;
pub use minimax::MinimaxAI;
pub use movegen::{legal_commands, MoveGenerator};
pub use mtdf::MtdfAI;
pub use negamax::NegamaxAI;
pub use random::RandomAI;
pub use search::{is_decided, DEFAULT_SEED};
pub use stats::AiStats;
pub use tt::{NodeType, TranspositionTable, TtEntry};

use crate::error::HiveError;
use crate::game::{CommandProvider, GameCommand, GameState};

/// A computer player
pub trait HiveAI: Send {
    fn name(&self) -> &str;

    /// Choose a command for the active player. `state` is restored before
    /// this returns.
    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError>;

    fn stats(&self) -> &AiStats;

    fn stats_mut(&mut self) -> &mut AiStats;

    /// Independent player with the same configuration and no history
    fn copy(&self) -> Box<dyn HiveAI>;
}

impl<T: HiveAI + ?Sized> CommandProvider for T {
    fn command(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        self.stats_mut().start_timer();
        let command = self.next_move(state);
        self.stats_mut().stop_timer();
        command
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::board::Hex;
    use crate::eval::{Heuristic, SimpleHeuristic, MAX_VALUE};
    use crate::game::GameStatus;
    use crate::pieces::Color;
    use crate::setups;

    const BUDGET: Duration = Duration::from_secs(120);

    fn heuristic() -> Arc<dyn Heuristic> {
        Arc::new(SimpleHeuristic::v1())
    }

    fn all_ais(depth: u32) -> Vec<Box<dyn HiveAI>> {
        vec![
            Box::new(MinimaxAI::new("minimax", heuristic(), depth, BUDGET)),
            Box::new(NegamaxAI::new("negamax", heuristic(), depth, BUDGET)),
            Box::new(AlphaBetaAI::new("alphabeta", heuristic(), depth, BUDGET)),
            Box::new(IddfsAI::new("iddfs", heuristic(), depth, BUDGET)),
            Box::new(IddfsAI::new("iddfs-killers", heuristic(), depth, BUDGET).with_killer_moves()),
            Box::new(MtdfAI::new("mtdf", heuristic(), depth, BUDGET)),
        ]
    }

    #[test]
    fn test_every_ai_finds_win_in_one() {
        for mut ai in all_ais(1) {
            let mut state = setups::sure_win_in_one_turn().unwrap();
            let key = state.zobrist_key();
            let command = ai.next_move(&mut state).unwrap();
            assert_eq!(command.to(), Some(Hex::new(1, 1)), "{} chose {}", ai.name(), command);
            assert_eq!(state.zobrist_key(), key, "{} left the state modified", ai.name());
            assert!(ai.stats().positions_evaluated > 0);
        }
    }

    #[test]
    fn test_deeper_searches_still_take_win_in_one() {
        let mut ai = IddfsAI::new("iddfs", heuristic(), 2, BUDGET).with_killer_moves();
        let mut state = setups::sure_win_in_one_turn().unwrap();
        let command = ai.next_move(&mut state).unwrap();
        assert_eq!(command.to(), Some(Hex::new(1, 1)));
        assert_eq!(ai.last_value(), Some(MAX_VALUE));
    }

    #[test]
    fn test_win_in_two_turns() {
        let queen_neighbors = [Hex::new(2, 1), Hex::new(0, 2)];
        let ais: Vec<Box<dyn HiveAI>> = vec![
            Box::new(IddfsAI::new("iddfs", heuristic(), 3, BUDGET).with_killer_moves()),
            Box::new(AlphaBetaAI::new("alphabeta", heuristic(), 3, BUDGET)),
        ];
        for mut ai in ais {
            let mut state = setups::sure_win_in_two_turns().unwrap();
            let command = ai.next_move(&mut state).unwrap();
            let to = command.to().unwrap();
            assert!(queen_neighbors.contains(&to), "{} chose {}", ai.name(), command);
        }
    }

    #[test]
    fn test_alphabeta_agrees_with_minimax() {
        let mut state = GameState::base_game();
        state.start();
        let mut opening = RandomAI::with_seed("opening", 7);
        for _ in 0..4 {
            state.continue_with(&mut opening).unwrap();
        }

        let mut minimax = MinimaxAI::new("minimax", heuristic(), 2, BUDGET);
        let mut alphabeta = AlphaBetaAI::new("alphabeta", heuristic(), 2, BUDGET);
        let mut negamax = NegamaxAI::new("negamax", heuristic(), 2, BUDGET);
        minimax.next_move(&mut state).unwrap();
        alphabeta.next_move(&mut state).unwrap();
        negamax.next_move(&mut state).unwrap();

        assert!(minimax.last_value().is_some());
        assert_eq!(minimax.last_value(), alphabeta.last_value());
        assert_eq!(minimax.last_value(), negamax.last_value());
        assert!(alphabeta.stats().positions_evaluated <= minimax.stats().positions_evaluated);
    }

    #[test]
    fn test_iddfs_fills_table() {
        let mut ai = IddfsAI::new("iddfs", heuristic(), 2, BUDGET);
        let mut state = setups::sure_win_in_two_turns().unwrap();
        ai.next_move(&mut state).unwrap();
        assert!(!ai.table().is_empty());
    }

    #[test]
    fn test_expired_clock_falls_back_to_legal_move() {
        let mut ai = IddfsAI::new("hasty", heuristic(), 4, Duration::ZERO);
        let mut state = setups::sure_win_in_two_turns().unwrap();
        let command = ai.next_move(&mut state).unwrap();
        assert!(state.is_legal_command(command));
        assert_eq!(ai.last_value(), None);
    }

    #[test]
    fn test_random_game_runs_to_the_end() {
        let mut state = GameState::base_game().with_turn_limit(30);
        let mut white = RandomAI::with_seed("white", 1);
        let mut black = RandomAI::with_seed("black", 2);
        let status = state.play(&mut white, &mut black).unwrap();
        assert!(status.is_terminal());
        assert!(state.player(Color::White).has_placed_queen());
        assert!(state.player(Color::Black).has_placed_queen());
        assert_eq!(white.stats().moves() as u32, state.player(Color::White).moves);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut ai = AlphaBetaAI::new("ab", heuristic(), 1, BUDGET).with_seed(3);
        let mut state = setups::sure_win_in_one_turn().unwrap();
        state.continue_with(&mut ai).unwrap();
        assert_eq!(state.status(), GameStatus::BlackWins);
        let copy = ai.copy();
        assert_eq!(copy.name(), "ab");
        assert_eq!(copy.stats().moves(), 0);
        assert_eq!(ai.stats().moves(), 1);
    }

    #[test]
    fn test_ais_play_each_other() {
        let mut state = GameState::base_game().with_turn_limit(6);
        let mut white = IddfsAI::new("white", heuristic(), 1, BUDGET).with_generator(MoveGenerator::AggressiveFirst);
        let mut black = MtdfAI::new("black", Arc::new(SimpleHeuristic::v3()), 1, BUDGET);
        let status = state.play(&mut white, &mut black).unwrap();
        assert!(status.is_terminal());
    }
}
