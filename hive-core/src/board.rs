//! Hex board geometry with axial coordinates and stacked tokens

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HiveError;
use crate::pieces::{BugType, Color, Token};
use crate::position::{self, StandardPosition, StandardPositionMode};

/// Number of tokens consulted for the opening Standard Position
const OPENING_ANCHORS: usize = 4;

// ============================================================================
// HEX COORDINATES
// ============================================================================

/// Axial hex coordinates. The grid is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, clockwise from north
    pub fn neighbors(&self) -> [Hex; 6] {
        std::array::from_fn(|d| self.neighbor(d))
    }

    /// Direction index from `self` to an adjacent hex
    pub fn direction_to(&self, other: Hex) -> Option<usize> {
        let delta = (other.q - self.q, other.r - self.r);
        DIRECTIONS.iter().position(|&d| d == delta)
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Bounding box over filled hexes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_q: i32,
    pub max_q: i32,
    pub min_r: i32,
    pub max_r: i32,
}

// ============================================================================
// HEX BOARD
// ============================================================================

/// Sparse board: coordinate -> stack of tokens (bottom to top).
///
/// Only non-empty stacks are stored; any other coordinate behaves as an
/// empty hex. Every mutation keeps the Standard Position transform and the
/// Zobrist accumulator up to date.
#[derive(Clone, Debug)]
pub struct HexBoard {
    stacks: FxHashMap<Hex, Vec<Token>>,
    positions: FxHashMap<Token, Hex>,
    mimics: FxHashMap<Token, BugType>,
    /// First tokens placed, in placement order
    anchors: Vec<Token>,
    mode: StandardPositionMode,
    transform: Option<StandardPosition>,
    zobrist: u64,
}

impl Default for HexBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl HexBoard {
    pub fn new() -> Self {
        Self::with_mode(StandardPositionMode::default())
    }

    pub fn with_mode(mode: StandardPositionMode) -> Self {
        Self {
            stacks: FxHashMap::default(),
            positions: FxHashMap::default(),
            mimics: FxHashMap::default(),
            anchors: Vec::with_capacity(OPENING_ANCHORS),
            mode,
            transform: None,
            zobrist: 0,
        }
    }

    pub fn mode(&self) -> StandardPositionMode {
        self.mode
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Put a token from supply on top of the stack at `hex`
    pub fn add_token(&mut self, token: Token, hex: Hex) -> Result<(), HiveError> {
        if let Some(at) = self.positions.get(&token) {
            return Err(HiveError::invariant(format!("{} is already on the board at {}", token, at)));
        }
        let stack = self.stacks.entry(hex).or_default();
        stack.push(token);
        let height = stack.len();
        self.positions.insert(token, hex);
        if self.anchors.len() < OPENING_ANCHORS {
            self.anchors.push(token);
        }
        self.after_mutation(token, None, Some((hex, height)))
    }

    /// Remove the top token at `hex` and return it
    pub fn remove_token(&mut self, hex: Hex) -> Result<Token, HiveError> {
        let (token, height) = self.pop(hex)?;
        self.anchors.retain(|t| *t != token);
        self.after_mutation(token, Some((hex, height)), None)?;
        Ok(token)
    }

    /// Move the top token of `from` onto `to`
    pub fn move_token(&mut self, from: Hex, to: Hex) -> Result<Token, HiveError> {
        let (token, old_height) = self.pop(from)?;
        let stack = self.stacks.entry(to).or_default();
        stack.push(token);
        let new_height = stack.len();
        self.positions.insert(token, to);
        self.after_mutation(token, Some((from, old_height)), Some((to, new_height)))?;
        Ok(token)
    }

    /// Move a specific token, which must be the top of its stack
    pub fn move_token_to(&mut self, token: Token, to: Hex) -> Result<(), HiveError> {
        let from = self
            .position(token)
            .ok_or_else(|| HiveError::invariant(format!("{} is not on the board", token)))?;
        if self.top(from) != Some(token) {
            return Err(HiveError::invariant(format!("{} is not the top of its stack", token)));
        }
        self.move_token(from, to).map(|_| ())
    }

    /// Set or clear the creature a Mosquito currently copies
    pub fn set_mimic(&mut self, token: Token, mimics: Option<BugType>) {
        match mimics {
            Some(bug) => self.mimics.insert(token, bug),
            None => self.mimics.remove(&token),
        };
    }

    pub fn clear(&mut self) {
        *self = Self::with_mode(self.mode);
    }

    fn pop(&mut self, hex: Hex) -> Result<(Token, usize), HiveError> {
        let stack = self
            .stacks
            .get_mut(&hex)
            .ok_or_else(|| HiveError::invariant(format!("no token at {}", hex)))?;
        let height = stack.len();
        let token = stack
            .pop()
            .ok_or_else(|| HiveError::invariant(format!("no token at {}", hex)))?;
        if stack.is_empty() {
            self.stacks.remove(&hex);
        }
        self.positions.remove(&token);
        Ok((token, height))
    }

    /// Refresh the canonical frame and fold the token's move into the key
    fn after_mutation(
        &mut self,
        token: Token,
        before: Option<(Hex, usize)>,
        after: Option<(Hex, usize)>,
    ) -> Result<(), HiveError> {
        let transform = self.derive_transform()?;
        if transform == self.transform {
            if let Some((hex, height)) = before {
                self.zobrist ^= position::token_key(self.canonical(hex), height, token);
            }
            if let Some((hex, height)) = after {
                self.zobrist ^= position::token_key(self.canonical(hex), height, token);
            }
        } else {
            self.transform = transform;
            self.zobrist = self.full_key();
        }
        debug_assert_eq!(self.zobrist, self.full_key());
        Ok(())
    }

    fn derive_transform(&self) -> Result<Option<StandardPosition>, HiveError> {
        match self.mode {
            StandardPositionMode::Disabled => Ok(None),
            StandardPositionMode::Enabled => {
                let white = self.position(Token::queen(Color::White));
                let black = self.position(Token::queen(Color::Black));
                match (white, black) {
                    (Some(w), Some(b)) => position::queen_frame(w, b).map(Some),
                    _ => self.opening_transform(),
                }
            }
            StandardPositionMode::Limited => self.opening_transform(),
        }
    }

    fn opening_transform(&self) -> Result<Option<StandardPosition>, HiveError> {
        let anchors: Vec<Hex> = self
            .anchors
            .iter()
            .filter_map(|t| self.position(*t))
            .collect();
        position::opening_frame(&anchors)
    }

    fn full_key(&self) -> u64 {
        self.stacks.iter().fold(0u64, |key, (hex, stack)| {
            let canonical = self.canonical(*hex);
            stack
                .iter()
                .enumerate()
                .fold(key, |k, (i, t)| k ^ position::token_key(canonical, i + 1, *t))
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tokens at `hex`, bottom to top
    pub fn stack(&self, hex: Hex) -> &[Token] {
        self.stacks.get(&hex).map_or(&[], |s| s.as_slice())
    }

    pub fn height(&self, hex: Hex) -> usize {
        self.stacks.get(&hex).map_or(0, |s| s.len())
    }

    pub fn is_empty_hex(&self, hex: Hex) -> bool {
        self.height(hex) == 0
    }

    pub fn top(&self, hex: Hex) -> Option<Token> {
        self.stacks.get(&hex).and_then(|s| s.last().copied())
    }

    /// Where a token currently is; `None` means it is in supply
    pub fn position(&self, token: Token) -> Option<Hex> {
        self.positions.get(&token).copied()
    }

    pub fn mimic(&self, token: Token) -> Option<BugType> {
        self.mimics.get(&token).copied()
    }

    /// Hexes around `hex`, clockwise from north
    pub fn neighbor_hexes(&self, hex: Hex) -> [Hex; 6] {
        hex.neighbors()
    }

    /// Top tokens around `hex`, clockwise from north
    pub fn neighbor_tokens(&self, hex: Hex) -> Vec<Token> {
        hex.neighbors().iter().filter_map(|n| self.top(*n)).collect()
    }

    /// The flanking hex clockwise of a slide from `from` to adjacent `to`
    pub fn clockwise_hex(&self, from: Hex, to: Hex) -> Option<Hex> {
        from.direction_to(to).map(|d| from.neighbor(d + 1))
    }

    /// The flanking hex counter-clockwise of a slide from `from` to adjacent `to`
    pub fn counter_clockwise_hex(&self, from: Hex, to: Hex) -> Option<Hex> {
        from.direction_to(to).map(|d| from.neighbor(d + 5))
    }

    /// Occupied hexes sorted by (q, r)
    pub fn filled_hexes(&self) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self.stacks.keys().copied().collect();
        hexes.sort_unstable();
        hexes
    }

    pub fn filled_count(&self) -> usize {
        self.stacks.len()
    }

    /// Number of tokens on the board
    pub fn token_count(&self) -> usize {
        self.positions.len()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut hexes = self.stacks.keys();
        let first = hexes.next()?;
        let init = Bounds { min_q: first.q, max_q: first.q, min_r: first.r, max_r: first.r };
        Some(hexes.fold(init, |b, h| Bounds {
            min_q: b.min_q.min(h.q),
            max_q: b.max_q.max(h.q),
            min_r: b.min_r.min(h.r),
            max_r: b.max_r.max(h.r),
        }))
    }

    /// Transposition key of the token layout (side to move not included)
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist
    }

    pub fn standard_position(&self) -> Option<StandardPosition> {
        self.transform
    }

    /// Canonical coordinate of `hex` under the current Standard Position
    pub fn canonical(&self, hex: Hex) -> Hex {
        self.transform.map_or(hex, |t| t.apply(hex))
    }
}

// ============================================================================
// TESTS
// ============================================================================
