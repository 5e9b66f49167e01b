//! Playouts (simulation phase)
//!
//! A playout plays uniformly random legal commands on the shared state until
//! the game is decided or the depth budget is spent, scores the position and
//! undoes everything it played.

use hive_core::ai::{is_decided, legal_commands};
use hive_core::{Color, GameState, HiveError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Result of a position for `root`: +1 won, -1 lost, 0 otherwise (both
/// queens down, turn limit or undecided)
pub fn score(state: &GameState, root: Color) -> f64 {
    let rules = state.rules();
    let board = state.board();
    let lost = rules.is_queen_surrounded(root, board);
    let won = rules.is_queen_surrounded(root.opponent(), board);
    match (won, lost) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Random playout of at most `max_depth` plies. `state` is restored on
/// return.
pub fn playout<R: Rng>(state: &mut GameState, max_depth: u32, root: Color, rng: &mut R) -> Result<f64, HiveError> {
    if max_depth == 0 || is_decided(state) {
        return Ok(score(state, root));
    }
    let commands = legal_commands(state);
    let Some(&command) = commands.choose(rng) else {
        return Ok(score(state, root));
    };
    let mut child = state.scoped(command)?;
    playout(&mut child, max_depth - 1, root, rng)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::setups;
    use hive_core::Hex;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_score_is_relative_to_root() {
        let mut state = setups::sure_win_in_one_turn().unwrap();
        assert_eq!(score(&state, Color::Black), 0.0);

        let spider = state.board().top(Hex::new(1, 3)).unwrap();
        state.board_mut().move_token_to(spider, Hex::new(1, 1)).unwrap();
        assert_eq!(score(&state, Color::Black), 1.0);
        assert_eq!(score(&state, Color::White), -1.0);
    }

    #[test]
    fn test_playout_restores_state() {
        let mut state = GameState::base_game().with_turn_limit(20);
        state.start();
        let key = state.zobrist_key();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = playout(&mut state, 40, Color::White, &mut rng).unwrap();

        assert!([-1.0, 0.0, 1.0].contains(&result));
        assert_eq!(state.zobrist_key(), key);
        assert!(state.board().filled_hexes().is_empty());
    }

    #[test]
    fn test_zero_depth_scores_in_place() {
        let mut state = setups::sure_win_in_one_turn().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(playout(&mut state, 0, Color::Black, &mut rng).unwrap(), 0.0);
    }
}
