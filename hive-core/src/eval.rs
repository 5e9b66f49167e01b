//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::game::GameState;
use crate::pieces::{BugType, Color, Token};

/// Value of a won position (for White)
pub const MAX_VALUE: i32 = i32::MAX;

/// Value of a lost position. Symmetric with [`MAX_VALUE`] so negation is exact.
pub const MIN_VALUE: i32 = -i32::MAX;

/// Static evaluation of a game state. Positive values favor White.
pub trait Heuristic: Send + Sync {
    fn board_value(&self, state: &GameState) -> i32;
}

/// Weighted difference of a few board features
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleHeuristic {
    /// Per token touching the opposing queen
    pub surround: i32,
    /// Per token free to move
    pub free_tokens: i32,
    /// Per token out of supply
    pub tokens_on_board: i32,
    /// Per Soldier Ant visible (top of its hex) on the board
    pub ants_in_play: i32,
    /// Distance from the sentinels when both queens fall at once
    pub draw_margin: i32,
}

impl Default for SimpleHeuristic {
    fn default() -> Self {
        Self::v1()
    }
}

impl SimpleHeuristic {
    pub fn v1() -> Self {
        Self { surround: 10, free_tokens: 2, tokens_on_board: 1, ants_in_play: 0, draw_margin: 5 }
    }

    pub fn v2() -> Self {
        Self { surround: 20, free_tokens: 5, tokens_on_board: 1, ants_in_play: 0, draw_margin: 0 }
    }

    pub fn v3() -> Self {
        Self { surround: 100, free_tokens: 10, tokens_on_board: 0, ants_in_play: 20, draw_margin: 1 }
    }

    /// Preset by name: `v1`, `v2` or `v3`
    pub fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "v1" => Some(Self::v1()),
            "v2" => Some(Self::v2()),
            "v3" => Some(Self::v3()),
            _ => None,
        }
    }

    fn features(&self, state: &GameState, color: Color) -> i32 {
        let board = state.board();
        let rules = state.rules();
        let player = state.player(color);

        let surround = board
            .position(Token::queen(color.opponent()))
            .map_or(0, |hex| board.neighbor_tokens(hex).len() as i32);
        let free = rules.free_tokens(color, board).len() as i32;
        let on_board = (player.starting_bugs() - player.supply().len()) as i32;
        let ants = board
            .filled_hexes()
            .into_iter()
            .filter_map(|h| board.top(h))
            .filter(|t| t.color == color && t.bug == BugType::SoldierAnt)
            .count() as i32;

        self.surround * surround
            + self.free_tokens * free
            + self.tokens_on_board * on_board
            + self.ants_in_play * ants
    }
}

impl Heuristic for SimpleHeuristic {
    fn board_value(&self, state: &GameState) -> i32 {
        let rules = state.rules();
        let board = state.board();
        let white_lost = rules.is_queen_surrounded(Color::White, board);
        let black_lost = rules.is_queen_surrounded(Color::Black, board);

        match (white_lost, black_lost) {
            // A draw scores close to a loss for the side to move
            (true, true) => match state.active_color() {
                Color::White => MIN_VALUE + self.draw_margin,
                Color::Black => MAX_VALUE - self.draw_margin,
            },
            (true, false) => MIN_VALUE,
            (false, true) => MAX_VALUE,
            (false, false) => {
                self.features(state, Color::White) - self.features(state, Color::Black)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
