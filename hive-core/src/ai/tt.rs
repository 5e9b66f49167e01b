//! Transposition table
//!
//! Entries are keyed on the board's Zobrist key alone. Turn counters are
//! not part of the key, so two positions that differ only in how close a
//! player is to the queen deadline or the turn limit share an entry even
//! though their legal moves may differ.

use rustc_hash::FxHashMap;

use crate::game::GameCommand;
use crate::pieces::Color;

/// What a stored value says about the true value of the node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// Exact value
    Pv,
    /// Failed high: the value is a lower bound
    Cut,
    /// Failed low: the value is an upper bound
    All,
}

impl NodeType {
    /// Classify a fail-soft search result against the window it was run with
    pub fn classify(value: i32, alpha: i32, beta: i32) -> Self {
        if value <= alpha {
            NodeType::All
        } else if value >= beta {
            NodeType::Cut
        } else {
            NodeType::Pv
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    /// Relative to the side to move at the node
    pub value: i32,
    pub depth: u32,
    pub node_type: NodeType,
    pub best_move: Option<GameCommand>,
}

/// Search results keyed by game Zobrist key. Values are only meaningful for
/// one maximizing color; switching colors clears the table.
#[derive(Clone, Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<u64, TtEntry>,
    owner: Option<Color>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a search maximizing `color`
    pub fn prepare(&mut self, color: Color) {
        if self.owner != Some(color) {
            self.entries.clear();
            self.owner = Some(color);
        }
    }

    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        self.entries.get(&key).copied()
    }

    /// Keep the deeper result; equal depth overwrites
    pub fn store(&mut self, key: u64, entry: TtEntry) {
        match self.entries.get(&key) {
            Some(existing) if existing.depth > entry.depth => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.owner = None;
    }
}
