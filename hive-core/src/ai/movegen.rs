//! Command generation for searches

use serde::{Deserialize, Serialize};

use crate::game::{GameCommand, GameState};
use crate::pieces::{BugType, Token};

/// Order in which a search sees the active player's commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveGenerator {
    /// Placements, then board moves
    #[default]
    Standard,
    /// Same commands, those landing next to the opposing queen first
    AggressiveFirst,
}

impl MoveGenerator {
    pub fn generate(&self, state: &GameState) -> Vec<GameCommand> {
        self.generate_with(state, &[])
    }

    /// Generate, then move any of `priority` that are legal to the front
    /// (in the order given)
    pub fn generate_with(&self, state: &GameState, priority: &[GameCommand]) -> Vec<GameCommand> {
        let mut commands = legal_commands(state);
        if *self == MoveGenerator::AggressiveFirst {
            if let Some(queen) = state.board().position(Token::queen(state.active_color().opponent())) {
                commands.sort_by_key(|c| !c.to().map_or(false, |to| to.distance_to(queen) == 1));
            }
        }
        if priority.is_empty() {
            return commands;
        }

        let mut front = Vec::with_capacity(commands.len());
        for p in priority {
            if let Some(i) = commands.iter().position(|c| c == p) {
                front.push(commands.remove(i));
            }
        }
        front.extend(commands);
        front
    }
}

/// Every command the active player may issue. Placements use one token per
/// creature kind; only the queen when it is due. Never empty: PASS when
/// nothing else is possible.
///
/// One position breaks that contract: the queen is due and the player has
/// no start hex. PASS is then the only entry, yet the engine refuses it
/// because a placement is mandatory, so `continue_game` reports
/// `IllegalCommand` and the game cannot go on.
pub fn legal_commands(state: &GameState) -> Vec<GameCommand> {
    let color = state.active_color();
    let player = state.active_player();
    let board = state.board();
    let rules = state.rules();
    let mut commands = Vec::new();

    let bugs = if player.is_queen_due() {
        vec![BugType::QueenBee]
    } else {
        player.supply_bugs()
    };
    if !bugs.is_empty() {
        let hexes = rules.start_hexes(color, board);
        for bug in bugs {
            if let Some(token) = player.peek_supply(bug) {
                commands.extend(hexes.iter().map(|to| GameCommand::place(token, *to)));
            }
        }
    }

    if player.has_placed_queen() {
        for token in rules.free_tokens(color, board) {
            let Some(from) = board.position(token) else {
                continue;
            };
            for to in rules.target_hexes(token, board) {
                commands.push(GameCommand::movement(token, from, to));
            }
        }
    }

    if commands.is_empty() {
        commands.push(GameCommand::Pass);
    }
    commands
}
