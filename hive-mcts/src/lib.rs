//! Hive MCTS - Monte Carlo Tree Search player
//!
//! This crate provides a Monte Carlo player for `hive-core`:
//! - Tree policy (UCT, or uniformly random descent)
//! - Random playouts on the shared game state
//! - Backpropagation from the root player's point of view

pub mod rollout;
pub mod search;
pub mod tree;

use std::time::Duration;

use hive_core::ai::{AiStats, DEFAULT_SEED};
use hive_core::{GameCommand, GameState, HiveAI, HiveError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use search::{run_search, SearchResult};
pub use tree::{GameNode, MctsTree, NodeId};

/// How the search descends through fully expanded nodes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreePolicy {
    /// Upper confidence bound for trees
    #[default]
    Uct,
    /// Uniformly random child
    Random,
}

/// MCTS configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MctsConfig {
    /// UCT exploration constant
    pub exploration: f64,
    /// Plies per playout
    pub max_depth: u32,
    /// Wall time per move
    pub time_limit: Duration,
    /// Stop after this many iterations even if time remains
    pub iterations: Option<u32>,
    pub policy: TreePolicy,
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: 1.41, // sqrt(2)
            max_depth: 70,
            time_limit: Duration::from_secs(20),
            iterations: None,
            policy: TreePolicy::Uct,
            seed: DEFAULT_SEED,
        }
    }
}

impl MctsConfig {
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_policy(mut self, policy: TreePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// MCTS player
#[derive(Clone)]
pub struct MctsPlayer {
    name: String,
    config: MctsConfig,
    rng: ChaCha8Rng,
    stats: AiStats,
    last_iterations: u32,
}

impl MctsPlayer {
    pub fn new(name: impl Into<String>, config: MctsConfig) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            stats: AiStats::default(),
            last_iterations: 0,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Iterations completed by the last search
    pub fn last_iterations(&self) -> u32 {
        self.last_iterations
    }

    /// Search the position and return the whole result, tree included
    pub fn search(&mut self, state: &mut GameState) -> Result<SearchResult, HiveError> {
        let result = run_search(state, &self.config, &mut self.rng, &mut self.stats)?;
        self.last_iterations = result.iterations;
        debug!(
            player = %self.name,
            iterations = result.iterations,
            nodes = result.tree.len(),
            command = %result.command,
            "mcts search finished"
        );
        Ok(result)
    }
}

impl HiveAI for MctsPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        Ok(self.search(state)?.command)
    }

    fn stats(&self) -> &AiStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut AiStats {
        &mut self.stats
    }

    fn copy(&self) -> Box<dyn HiveAI> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{setups, Color, RandomAI};

    fn quick(iterations: u32) -> MctsConfig {
        MctsConfig::default()
            .with_iterations(iterations)
            .with_max_depth(0)
            .with_time_limit(Duration::from_secs(600))
    }

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.exploration, 1.41);
        assert_eq!(config.policy, TreePolicy::Uct);
        assert_eq!(config.iterations, None);
        assert_eq!(quick(5).iterations, Some(5));
    }

    #[test]
    fn test_player_takes_win_in_one() {
        let mut player = MctsPlayer::new("mcts", quick(2000));
        let mut state = setups::sure_win_in_one_turn().unwrap();
        let status = state.continue_with(&mut player).unwrap();
        assert_eq!(status, hive_core::GameStatus::BlackWins);
        assert_eq!(player.stats().moves(), 1);
        assert_eq!(player.last_iterations(), 2000);
    }

    #[test]
    fn test_copy_restarts_random_stream() {
        let config = quick(50).with_max_depth(6).with_seed(17);
        let mut player = MctsPlayer::new("mcts", config);
        let mut copy = player.copy();
        let mut state = setups::sure_win_in_two_turns().unwrap();
        let first = player.next_move(&mut state).unwrap();
        let second = copy.next_move(&mut state).unwrap();
        assert_eq!(first, second);
        assert_eq!(copy.name(), "mcts");
    }

    #[test]
    fn test_plays_a_short_game() {
        let mut state = GameState::base_game().with_turn_limit(4);
        let mut white = MctsPlayer::new("white", quick(30).with_max_depth(4));
        let mut black = RandomAI::with_seed("black", 4);
        let status = state.play(&mut white, &mut black).unwrap();
        assert!(status.is_terminal());
        assert!(state.player(Color::White).has_placed_queen());
        assert_eq!(state.moves().len(), 8);
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = quick(10).with_policy(TreePolicy::Random);
        let text = serde_json::to_string(&config).unwrap();
        let back: MctsConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
