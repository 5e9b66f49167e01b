//! Uniformly random player

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::movegen::legal_commands;
use crate::ai::search::DEFAULT_SEED;
use crate::ai::stats::AiStats;
use crate::ai::HiveAI;
use crate::error::HiveError;
use crate::game::{GameCommand, GameState};
use crate::pieces::BugType;

/// Picks any legal command. While its queen is in supply it places the
/// queen half of the time.
#[derive(Clone)]
pub struct RandomAI {
    name: String,
    seed: u64,
    rng: ChaCha8Rng,
    stats: AiStats,
}

impl RandomAI {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_seed(name, DEFAULT_SEED)
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: AiStats::default(),
        }
    }
}

impl HiveAI for RandomAI {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_move(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError> {
        let commands = legal_commands(state);
        if !state.active_player().has_placed_queen() && self.rng.gen_bool(0.5) {
            let queen: Vec<GameCommand> = commands
                .iter()
                .copied()
                .filter(|c| c.is_placement() && c.token().map(|t| t.bug) == Some(BugType::QueenBee))
                .collect();
            if let Some(command) = queen.choose(&mut self.rng) {
                return Ok(*command);
            }
        }
        Ok(commands.choose(&mut self.rng).copied().unwrap_or(GameCommand::Pass))
    }

    fn stats(&self) -> &AiStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut AiStats {
        &mut self.stats
    }

    fn copy(&self) -> Box<dyn HiveAI> {
        Box::new(Self::with_seed(self.name.clone(), self.seed))
    }
}
