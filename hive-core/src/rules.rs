//! Movement legality: one-hive, freedom to move, sliding and climbing
//!
//! Path searches (Spider, Ant, Lady Bug) never touch the board. They run on
//! a [`Surface`], a view of the board's stack heights with the moving token
//! lifted off its origin and dropped wherever the search currently is.

use rustc_hash::FxHashSet;

use crate::board::{Hex, HexBoard};
use crate::creatures;
use crate::pieces::{BugType, Color, Token};

// ============================================================================
// SURFACE (board heights with one token in transit)
// ============================================================================

#[derive(Clone, Copy)]
pub(crate) struct Surface<'a> {
    pub board: &'a HexBoard,
    lifted: Option<Hex>,
    placed: Option<Hex>,
}

impl<'a> Surface<'a> {
    /// The board as it is
    pub fn of(board: &'a HexBoard) -> Self {
        Self { board, lifted: None, placed: None }
    }

    /// The board with the top token of `origin` picked up and held over `origin`
    pub fn lifting(board: &'a HexBoard, origin: Hex) -> Self {
        Self { board, lifted: Some(origin), placed: Some(origin) }
    }

    /// Same lifted token, now held over `hex`
    pub fn at(self, hex: Hex) -> Self {
        Self { placed: Some(hex), ..self }
    }

    pub fn height(&self, hex: Hex) -> usize {
        let mut h = self.board.height(hex);
        if self.lifted == Some(hex) {
            h -= 1;
        }
        if self.placed == Some(hex) {
            h += 1;
        }
        h
    }

    pub fn is_filled(&self, hex: Hex) -> bool {
        self.height(hex) > 0
    }

    fn flanks(&self, from: Hex, to: Hex) -> Option<(usize, usize)> {
        let cw = self.board.clockwise_hex(from, to)?;
        let ccw = self.board.counter_clockwise_hex(from, to)?;
        Some((self.height(cw), self.height(ccw)))
    }

    /// Slide from `from` (holding the mover) to adjacent `to`
    pub fn can_slide(&self, from: Hex, to: Hex) -> bool {
        let Some((left, right)) = self.flanks(from, to) else {
            return false;
        };
        let from_h = self.height(from);
        let to_h = self.height(to);
        if from_h == 1 && to_h == 0 {
            // Ground: must hug exactly one neighbor
            (left == 0) != (right == 0)
        } else if from_h > 1 && to_h < from_h {
            !(left > from_h && right > from_h)
        } else {
            false
        }
    }

    pub fn can_crawl_up(&self, from: Hex, to: Hex) -> bool {
        let Some((left, right)) = self.flanks(from, to) else {
            return false;
        };
        let from_h = self.height(from);
        if from_h == 0 {
            return false;
        }
        let to_h = self.height(to);
        if from_h == 1 && to_h == 0 {
            // Ground to ground is a slide, never a climb
            return false;
        }
        let below = from_h - 1;
        let gated = below < left && below < right && to_h < left && to_h < right;
        !gated
    }

    pub fn can_crawl_down(&self, from: Hex, to: Hex) -> bool {
        let Some((left, right)) = self.flanks(from, to) else {
            return false;
        };
        let from_h = self.height(from);
        if from_h < 2 || self.height(to) != 0 {
            return false;
        }
        left < from_h || right < from_h
    }

    /// Leaving `from` for `to` keeps the moved token attached to the hive
    pub fn one_hive_intact(&self, from: Hex, to: Hex) -> bool {
        self.height(to) > 0
            || self.height(from) > 1
            || to.neighbors().iter().any(|n| *n != from && self.is_filled(*n))
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Stateless rule set. Construct once and pass by reference (or copy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rules;

impl Rules {
    pub fn new() -> Self {
        Rules
    }

    /// Legal destinations for a token on the board. Empty if it may not move.
    pub fn target_hexes(&self, token: Token, board: &HexBoard) -> Vec<Hex> {
        let Some(origin) = board.position(token) else {
            return Vec::new();
        };
        if !self.is_free_to_move(token, board) {
            return Vec::new();
        }
        let mut targets = creatures::targets(self.effective_bug(token, board), origin, board);
        targets.retain(|h| *h != origin);
        targets
    }

    /// Token is on top of its stack, its removal keeps the hive connected and
    /// its creature is able to get out
    pub fn is_free_to_move(&self, token: Token, board: &HexBoard) -> bool {
        let Some(origin) = board.position(token) else {
            return false;
        };
        if board.top(origin) != Some(token) {
            return false;
        }
        if !self.hive_survives_removal(origin, board) {
            return false;
        }
        creatures::is_free(self.effective_bug(token, board), origin, board)
    }

    /// Free tokens of one color, in board order
    pub fn free_tokens(&self, color: Color, board: &HexBoard) -> Vec<Token> {
        board
            .filled_hexes()
            .into_iter()
            .filter_map(|h| board.top(h))
            .filter(|t| t.color == color && self.is_free_to_move(*t, board))
            .collect()
    }

    /// Where `color` may place a token from supply
    pub fn start_hexes(&self, color: Color, board: &HexBoard) -> Vec<Hex> {
        let filled = board.filled_hexes();
        match filled.len() {
            0 => return vec![Hex::ORIGIN],
            1 => return filled[0].neighbors().to_vec(),
            _ => {}
        }

        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for hex in filled {
            if board.top(hex).map(|t| t.color) != Some(color) {
                continue;
            }
            for n in hex.neighbors() {
                if !board.is_empty_hex(n) || !seen.insert(n) {
                    continue;
                }
                let touches_enemy = n
                    .neighbors()
                    .iter()
                    .any(|x| board.top(*x).map_or(false, |t| t.color != color));
                if !touches_enemy {
                    result.push(n);
                }
            }
        }
        result
    }

    pub fn can_slide_to(&self, from: Hex, to: Hex, board: &HexBoard) -> bool {
        Surface::of(board).can_slide(from, to)
    }

    pub fn can_crawl_up(&self, from: Hex, to: Hex, board: &HexBoard) -> bool {
        Surface::of(board).can_crawl_up(from, to)
    }

    pub fn can_crawl_down(&self, from: Hex, to: Hex, board: &HexBoard) -> bool {
        Surface::of(board).can_crawl_down(from, to)
    }

    pub fn is_one_hive_intact(&self, from: Hex, to: Hex, board: &HexBoard) -> bool {
        Surface::of(board).one_hive_intact(from, to)
    }

    pub fn is_queen_surrounded(&self, color: Color, board: &HexBoard) -> bool {
        match board.position(Token::queen(color)) {
            Some(hex) => hex.neighbors().iter().all(|n| !board.is_empty_hex(*n)),
            None => false,
        }
    }

    /// Tokens a Mosquito could copy: its neighbors, or nothing when it is
    /// on top of the hive (it then moves as a Beetle)
    pub fn mimic_list(&self, token: Token, board: &HexBoard) -> Vec<Token> {
        match board.position(token) {
            Some(hex) if board.height(hex) == 1 => board.neighbor_tokens(hex),
            _ => Vec::new(),
        }
    }

    /// Let `mosquito` copy the creature of `source`. Copying another
    /// Mosquito gives nothing and is refused.
    pub fn mimic(&self, mosquito: Token, source: Token, board: &mut HexBoard) -> bool {
        let allowed = mosquito.bug.can_mimic()
            && source.bug != BugType::Mosquito
            && self.mimic_list(mosquito, board).contains(&source);
        if allowed {
            board.set_mimic(mosquito, Some(source.bug));
        }
        allowed
    }

    /// Creature rules a token moves by. A copied creature only applies while
    /// the Mosquito is on the ground.
    pub fn effective_bug(&self, token: Token, board: &HexBoard) -> BugType {
        if !token.bug.can_mimic() {
            return token.bug;
        }
        match (board.mimic(token), board.position(token)) {
            (Some(bug), Some(hex)) if board.height(hex) == 1 => bug,
            _ => token.bug,
        }
    }

    /// Removing the top token of `origin` leaves one connected hive
    fn hive_survives_removal(&self, origin: Hex, board: &HexBoard) -> bool {
        if board.height(origin) > 1 {
            return true;
        }
        let Some(start) = origin.neighbors().into_iter().find(|n| !board.is_empty_hex(*n)) else {
            return false;
        };

        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut stack = vec![start];
        while let Some(hex) = stack.pop() {
            for n in hex.neighbors() {
                if n != origin && !board.is_empty_hex(n) && visited.insert(n) {
                    stack.push(n);
                }
            }
        }
        visited.len() == board.filled_count() - 1
    }
}

// ============================================================================
// TESTS
// ============================================================================
