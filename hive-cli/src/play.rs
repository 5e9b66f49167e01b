//! Play command - computer players against each other
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hive_core::ai::AiStats;
use hive_core::{Color, GameState, GameStatus, HiveAI};

use crate::config::{AiConfig, GameConfig, PlayerType};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// White player type
    #[arg(long, value_enum, default_value = "iddfs")]
    pub white: PlayerType,

    /// Black player type
    #[arg(long, value_enum, default_value = "random")]
    pub black: PlayerType,

    /// JSON file with both players' settings (overrides the flags above)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Search depth for the minimax family
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Thinking time per move, in milliseconds
    #[arg(long, default_value = "5000")]
    pub time_ms: u64,

    /// Heuristic preset (v1, v2, v3)
    #[arg(long, default_value = "v1")]
    pub heuristic: String,

    /// Turns per player before the game is called
    #[arg(long, default_value = "40")]
    pub turn_limit: u32,

    /// Number of games to play (colors alternate)
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Base random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    white: String,
    black: String,
    status: GameStatus,
    moves: Vec<String>,
    white_stats: AiStats,
    black_stats: AiStats,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    games: Vec<GameRecord>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    turn_limits: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve both players' settings
/// 2. Play the games
/// 3. Report results
pub fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;

    tracing::info!(
        white = ?config.white.player_type,
        black = ?config.black.player_type,
        games = args.games,
        turn_limit = ?config.turn_limit,
        "starting play"
    );

    let results = play_match(&config, args.games)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Settings from `--config` when given, otherwise from the flags
fn load_config(args: &PlayArgs) -> Result<GameConfig> {
    if let Some(path) = &args.config {
        let mut config = GameConfig::load(path)?;
        config.turn_limit.get_or_insert(args.turn_limit);
        return Ok(config);
    }

    let side = |player_type, seed| AiConfig {
        player_type,
        depth: args.depth,
        time_limit_ms: args.time_ms,
        heuristic: args.heuristic.clone(),
        seed,
        ..AiConfig::default()
    };
    Ok(GameConfig {
        white: side(args.white, args.seed),
        black: side(args.black, args.seed.wrapping_add(1)),
        turn_limit: Some(args.turn_limit),
    })
}

/// Play all games, swapping colors every other game
fn play_match(config: &GameConfig, games: usize) -> Result<MatchResults> {
    let first = config.white.build("player-1")?;
    let second = config.black.build("player-2")?;
    let mut records = Vec::with_capacity(games);

    for game_number in 1..=games {
        let record = if game_number % 2 == 0 {
            play_single_game(second.copy(), first.copy(), game_number, config.turn_limit)?
        } else {
            play_single_game(first.copy(), second.copy(), game_number, config.turn_limit)?
        };

        tracing::info!(
            game = record.game_number,
            status = ?record.status,
            moves = record.moves.len(),
            "game finished"
        );
        records.push(record);
    }

    Ok(compute_match_statistics(records))
}

/// Print match results
fn report_results(results: &MatchResults, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
        println!("{}", text);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to the end, logging each move
fn play_single_game(
    mut white: Box<dyn HiveAI>,
    mut black: Box<dyn HiveAI>,
    game_number: usize,
    turn_limit: Option<u32>,
) -> Result<GameRecord> {
    let mut state = GameState::base_game().with_turn_limit(turn_limit.unwrap_or(0));
    state.start();

    while state.status() == GameStatus::InProgress {
        let color = state.active_color();
        let player = match color {
            Color::White => white.as_mut(),
            Color::Black => black.as_mut(),
        };
        state
            .continue_with(player)
            .with_context(|| format!("Game {}: {} failed to move", game_number, color))?;
        if let Some(command) = state.moves().last() {
            tracing::info!(game = game_number, player = %color, %command, "move");
        }
    }

    Ok(GameRecord {
        game_number,
        white: white.name().to_string(),
        black: black.name().to_string(),
        status: state.status(),
        moves: state.moves().iter().map(|c| c.to_string()).collect(),
        white_stats: white.stats().clone(),
        black_stats: black.stats().clone(),
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |status| games.iter().filter(|g| g.status == status).count();
    let white_wins = count(GameStatus::WhiteWins);
    let black_wins = count(GameStatus::BlackWins);
    let draws = count(GameStatus::Draw);
    let turn_limits = count(GameStatus::TurnLimitReached);

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults { games, white_wins, black_wins, draws, turn_limits, avg_moves }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(results: &MatchResults) {
    for game in &results.games {
        println!("Game {}: {} (white) vs {} (black)", game.game_number, game.white, game.black);
        for (i, command) in game.moves.iter().enumerate() {
            println!("  {:3}. {}", i + 1, command);
        }
        println!("  Result: {:?}", game.status);
        print_stats("white", &game.white_stats);
        print_stats("black", &game.black_stats);
    }

    println!();
    println!("Games:       {}", results.games.len());
    println!("White wins:  {}", results.white_wins);
    println!("Black wins:  {}", results.black_wins);
    println!("Draws:       {}", results.draws);
    println!("Turn limits: {}", results.turn_limits);
    println!("Avg moves:   {:.1}", results.avg_moves);
}

fn print_stats(side: &str, stats: &AiStats) {
    println!(
        "  {}: {} moves, avg {:.1} ms, max {} ms, {} positions, {} cache hits, branching {:.1}",
        side,
        stats.moves(),
        stats.average_move_ms(),
        stats.max_move_ms(),
        stats.positions_evaluated,
        stats.cache_hits,
        stats.average_branching()
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PlayArgs {
        PlayArgs {
            white: PlayerType::Random,
            black: PlayerType::AlphaBeta,
            config: None,
            depth: 1,
            time_ms: 1_000,
            heuristic: "v2".into(),
            turn_limit: 5,
            games: 2,
            seed: 7,
            json: false,
        }
    }

    #[test]
    fn test_flags_become_config() {
        let config = load_config(&args()).unwrap();
        assert_eq!(config.white.player_type, PlayerType::Random);
        assert_eq!(config.black.depth, 1);
        assert_eq!(config.black.seed, 8);
        assert_eq!(config.turn_limit, Some(5));
    }

    #[test]
    fn test_match_alternates_colors() {
        let config = load_config(&args()).unwrap();
        let results = play_match(&config, 2).unwrap();

        assert_eq!(results.games.len(), 2);
        assert_eq!(results.games[0].white, "player-1");
        assert_eq!(results.games[1].white, "player-2");
        let decided = results.white_wins + results.black_wins + results.draws + results.turn_limits;
        assert_eq!(decided, 2);
    }
}
