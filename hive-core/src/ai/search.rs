//! State shared by the depth-limited searches

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::clock::SearchClock;
use crate::ai::movegen::MoveGenerator;
use crate::ai::stats::AiStats;
use crate::eval::Heuristic;
use crate::game::{GameCommand, GameState};
use crate::pieces::Color;

/// Seed used unless the caller picks one
pub const DEFAULT_SEED: u64 = 42;

/// Either queen is surrounded or the turn limit is reached
pub fn is_decided(state: &GameState) -> bool {
    let rules = state.rules();
    let board = state.board();
    rules.is_queen_surrounded(Color::White, board)
        || rules.is_queen_surrounded(Color::Black, board)
        || state.is_turn_limit_reached()
}

/// Configuration and per-move state every minimax-family AI carries
#[derive(Clone)]
pub(crate) struct SearchBase {
    pub name: String,
    pub heuristic: Arc<dyn Heuristic>,
    pub depth: u32,
    pub time_limit: Duration,
    pub generator: MoveGenerator,
    pub stats: AiStats,
    pub seed: u64,
    pub rng: ChaCha8Rng,
    /// Color the current search maximizes for
    pub maximizing: Color,
    pub clock: SearchClock,
    /// Root value of the last finished search
    pub last_value: Option<i32>,
}

impl SearchBase {
    pub fn new(name: String, heuristic: Arc<dyn Heuristic>, depth: u32, time_limit: Duration) -> Self {
        Self {
            name,
            heuristic,
            depth: depth.max(1),
            time_limit,
            generator: MoveGenerator::default(),
            stats: AiStats::default(),
            seed: DEFAULT_SEED,
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
            maximizing: Color::White,
            clock: SearchClock::default(),
            last_value: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Same configuration, fresh statistics and random stream
    pub fn fresh(&self) -> Self {
        Self::new(self.name.clone(), Arc::clone(&self.heuristic), self.depth, self.time_limit)
            .with_seed(self.seed)
            .with_generator(self.generator)
    }

    pub fn with_generator(mut self, generator: MoveGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Start a search for the active player of `state`
    pub fn begin(&mut self, state: &GameState) {
        self.maximizing = state.active_color();
        self.clock = SearchClock::start(self.time_limit);
        self.last_value = None;
    }

    /// Static value from the maximizing color's point of view
    pub fn value(&mut self, state: &GameState) -> i32 {
        self.stats.positions_evaluated += 1;
        let value = self.heuristic.board_value(state);
        match self.maximizing {
            Color::White => value,
            Color::Black => -value,
        }
    }

    /// Leaf test, checked once per node. Expiry marks the search aborted.
    pub fn is_leaf(&mut self, state: &GameState, depth: u32) -> bool {
        self.clock.expired() || depth == 0 || is_decided(state)
    }

    pub fn commands(&mut self, state: &GameState, priority: &[GameCommand]) -> Vec<GameCommand> {
        let commands = self.generator.generate_with(state, priority);
        self.stats.node_branched(commands.len());
        commands
    }
}
