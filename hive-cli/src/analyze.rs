//! Analyze command - ask one player for its move in a known position

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hive_core::{setups, GameCommand, GameState};

use crate::config::{AiConfig, PlayerType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Position {
    /// Empty board, White to move
    Opening,
    /// Black surrounds the white queen with one move
    WinInOne,
    /// Black wins on its second move whatever White does
    WinInTwo,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[arg(long, value_enum, default_value = "win-in-one")]
    pub position: Position,

    #[arg(long, value_enum, default_value = "iddfs-killers")]
    pub player: PlayerType,

    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Thinking time, in milliseconds
    #[arg(long, default_value = "10000")]
    pub time_ms: u64,

    /// MCTS iteration cap
    #[arg(long)]
    pub iterations: Option<u32>,

    #[arg(long, default_value = "v1")]
    pub heuristic: String,

    #[arg(long, default_value = "42")]
    pub seed: u64,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let mut state = load_position(args.position)?;
    let config = AiConfig {
        player_type: args.player,
        depth: args.depth,
        time_limit_ms: args.time_ms,
        heuristic: args.heuristic.clone(),
        seed: args.seed,
        iterations: args.iterations,
        ..AiConfig::default()
    };
    let mut ai = config.build("analyzer")?;

    let command = analyze(&mut state, ai.as_mut())?;
    tracing::info!(position = ?args.position, player = ?args.player, %command, "analysis finished");

    let stats = ai.stats();
    println!("Position:   {:?} ({} to move)", args.position, state.active_color());
    println!("Best move:  {}", command);
    println!("Time:       {} ms", stats.max_move_ms());
    println!("Positions:  {}", stats.positions_evaluated);
    println!("Cache hits: {}", stats.cache_hits);
    println!("Cutoffs:    {} (avg index {:.2})", stats.cutoffs, stats.average_cutoff_index());
    println!("Branching:  {:.1}", stats.average_branching());
    Ok(())
}

pub fn load_position(position: Position) -> Result<GameState> {
    let state = match position {
        Position::Opening => {
            let mut state = GameState::base_game();
            state.start();
            state
        }
        Position::WinInOne => setups::sure_win_in_one_turn().context("Failed to build position")?,
        Position::WinInTwo => setups::sure_win_in_two_turns().context("Failed to build position")?,
    };
    Ok(state)
}

/// One timed move from `ai`, checked against the rules
pub fn analyze(state: &mut GameState, ai: &mut dyn hive_core::HiveAI) -> Result<GameCommand> {
    ai.stats_mut().start_timer();
    let command = ai.next_move(state);
    ai.stats_mut().stop_timer();
    let command = command.context("Search failed")?;
    if !state.is_legal_command(command) {
        anyhow::bail!("{} proposed an illegal command: {}", ai.name(), command);
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::Hex;

    #[test]
    fn test_analyze_finds_the_winning_move() {
        let mut state = load_position(Position::WinInOne).unwrap();
        let config = AiConfig { player_type: PlayerType::AlphaBeta, depth: 1, ..AiConfig::default() };
        let mut ai = config.build("a").unwrap();
        let command = analyze(&mut state, ai.as_mut()).unwrap();
        assert_eq!(command.to(), Some(Hex::new(1, 1)));
        assert_eq!(ai.stats().moves(), 1);
    }

    #[test]
    fn test_opening_position_is_empty() {
        let state = load_position(Position::Opening).unwrap();
        assert!(state.board().filled_hexes().is_empty());
        assert_eq!(state.moves().len(), 0);
    }
}
