//! Hive Core - Board, rules and search
//!
//! This crate provides the engine for the board game Hive:
//! - Hex grid with stacking (axial coordinates, unbounded)
//! - Standard Position canonicalisation and Zobrist keys
//! - Movement rules for every creature
//! - Players, commands and the turn engine with replay
//! - Heuristics and minimax-family AIs

pub mod ai;
pub mod board;
mod creatures;
pub mod error;
pub mod eval;
pub mod game;
pub mod pieces;
pub mod position;
pub mod rules;
pub mod setups;

// Re-exports for convenient access
pub use ai::{AlphaBetaAI, HiveAI, IddfsAI, MinimaxAI, MoveGenerator, MtdfAI, NegamaxAI, RandomAI};
pub use board::{Hex, HexBoard, DIRECTIONS};
pub use error::HiveError;
pub use eval::{Heuristic, SimpleHeuristic, MAX_VALUE, MIN_VALUE};
pub use game::{CommandProvider, GameCommand, GameState, GameStatus, Player};
pub use pieces::{BugType, Color, Token};
pub use position::StandardPositionMode;
pub use rules::Rules;
