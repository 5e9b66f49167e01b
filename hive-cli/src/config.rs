//! Player configuration
//!
//! Each side of a game is described by an [`AiConfig`], either built from
//! command-line flags or read from a JSON file:
//!
//! ```json
//! {
//!   "turn_limit": 40,
//!   "white": { "player_type": "iddfs-killers", "depth": 3, "heuristic": "v2" },
//!   "black": { "player_type": "mcts", "time_limit_ms": 2000, "exploration": 1.0 }
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use hive_core::ai::DEFAULT_SEED;
use hive_core::{
    AlphaBetaAI, Heuristic, HiveAI, IddfsAI, MinimaxAI, MoveGenerator, MtdfAI, NegamaxAI, RandomAI,
    SimpleHeuristic,
};
use hive_mcts::{MctsConfig, MctsPlayer, TreePolicy};

// ============================================================================
// TYPES
// ============================================================================

/// Kind of computer player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerType {
    Random,
    Minimax,
    Negamax,
    AlphaBeta,
    #[default]
    Iddfs,
    IddfsKillers,
    Mtdf,
    Mcts,
    MctsRandom,
}

/// Settings for one player. Fields a player type does not use are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub player_type: PlayerType,
    /// Search depth (minimax family)
    pub depth: u32,
    pub time_limit_ms: u64,
    /// Heuristic preset: v1, v2 or v3
    pub heuristic: String,
    pub seed: u64,
    /// MCTS iteration cap
    pub iterations: Option<u32>,
    /// MCTS exploration constant
    pub exploration: f64,
    /// MCTS plies per playout
    pub max_depth: u32,
    pub generator: MoveGenerator,
}

impl Default for AiConfig {
    fn default() -> Self {
        let mcts = MctsConfig::default();
        Self {
            player_type: PlayerType::default(),
            depth: 3,
            time_limit_ms: 5_000,
            heuristic: "v1".to_string(),
            seed: DEFAULT_SEED,
            iterations: None,
            exploration: mcts.exploration,
            max_depth: mcts.max_depth,
            generator: MoveGenerator::default(),
        }
    }
}

/// Both sides of a game, as read from `--config`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub white: AiConfig,
    pub black: AiConfig,
    pub turn_limit: Option<u32>,
}

// ============================================================================
// LOADING
// ============================================================================

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// PLAYER CONSTRUCTION
// ============================================================================

impl AiConfig {
    pub fn heuristic(&self) -> Result<Arc<dyn Heuristic>> {
        match SimpleHeuristic::named(&self.heuristic) {
            Some(h) => Ok(Arc::new(h)),
            None => bail!("unknown heuristic '{}' (expected v1, v2 or v3)", self.heuristic),
        }
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    pub fn mcts_config(&self) -> MctsConfig {
        let policy = match self.player_type {
            PlayerType::MctsRandom => TreePolicy::Random,
            _ => TreePolicy::Uct,
        };
        let mut config = MctsConfig::default()
            .with_exploration(self.exploration)
            .with_max_depth(self.max_depth)
            .with_time_limit(self.time_limit())
            .with_policy(policy)
            .with_seed(self.seed);
        config.iterations = self.iterations;
        config
    }

    /// Build the player this configuration describes
    pub fn build(&self, name: &str) -> Result<Box<dyn HiveAI>> {
        let depth = self.depth;
        let time = self.time_limit();
        let ai: Box<dyn HiveAI> = match self.player_type {
            PlayerType::Random => Box::new(RandomAI::with_seed(name, self.seed)),
            PlayerType::Minimax => Box::new(
                MinimaxAI::new(name, self.heuristic()?, depth, time)
                    .with_seed(self.seed)
                    .with_generator(self.generator),
            ),
            PlayerType::Negamax => Box::new(
                NegamaxAI::new(name, self.heuristic()?, depth, time)
                    .with_seed(self.seed)
                    .with_generator(self.generator),
            ),
            PlayerType::AlphaBeta => Box::new(
                AlphaBetaAI::new(name, self.heuristic()?, depth, time)
                    .with_seed(self.seed)
                    .with_generator(self.generator),
            ),
            PlayerType::Iddfs => Box::new(
                IddfsAI::new(name, self.heuristic()?, depth, time)
                    .with_seed(self.seed)
                    .with_generator(self.generator),
            ),
            PlayerType::IddfsKillers => Box::new(
                IddfsAI::new(name, self.heuristic()?, depth, time)
                    .with_seed(self.seed)
                    .with_generator(self.generator)
                    .with_killer_moves(),
            ),
            PlayerType::Mtdf => Box::new(
                MtdfAI::new(name, self.heuristic()?, depth, time)
                    .with_seed(self.seed)
                    .with_generator(self.generator),
            ),
            PlayerType::Mcts | PlayerType::MctsRandom => Box::new(MctsPlayer::new(name, self.mcts_config())),
        };
        Ok(ai)
    }
}

// ============================================================================
// TESTS
// ============================================================================
