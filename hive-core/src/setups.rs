//! Known positions for tests and analysis

use crate::board::{Hex, HexBoard};
use crate::error::HiveError;
use crate::game::{GameState, GameStatus};
use crate::pieces::{BugType, Color, Token};

/// Board with tokens stacked in the given order, e.g. `("wQ", 0, 0)`
pub fn board_with(layout: &[(&str, i32, i32)]) -> Result<HexBoard, HiveError> {
    let mut board = HexBoard::new();
    for &(id, q, r) in layout {
        let token: Token = id.parse()?;
        board.add_token(token, Hex::new(q, r))?;
    }
    Ok(board)
}

fn place(state: &mut GameState, color: Color, bug: BugType, q: i32, r: i32) -> Result<(), HiveError> {
    let token = state
        .player_mut(color)
        .take_from_supply(bug)
        .ok_or_else(|| HiveError::invariant(format!("no {} left for {}", bug.name(), color)))?;
    state.board_mut().add_token(token, Hex::new(q, r))
}

fn running(mut state: GameState, moves: u32) -> GameState {
    state.player_mut(Color::White).moves = moves;
    state.player_mut(Color::Black).moves = moves;
    state.set_active(Color::Black);
    state.status = GameStatus::InProgress;
    state
}

/// Black to move and wins by filling (1,1), the last free hex around the
/// white queen at (0,2).
pub fn sure_win_in_one_turn() -> Result<GameState, HiveError> {
    let mut state = GameState::base_game().with_turn_limit(10);

    place(&mut state, Color::White, BugType::SoldierAnt, 0, 0)?;
    place(&mut state, Color::White, BugType::Beetle, 0, 1)?;
    place(&mut state, Color::White, BugType::QueenBee, 0, 2)?;
    place(&mut state, Color::White, BugType::Grasshopper, 0, 4)?;
    place(&mut state, Color::White, BugType::Grasshopper, 0, 5)?;
    place(&mut state, Color::White, BugType::SoldierAnt, 1, 2)?;

    place(&mut state, Color::Black, BugType::Grasshopper, -2, 4)?;
    place(&mut state, Color::Black, BugType::SoldierAnt, -1, 2)?;
    place(&mut state, Color::Black, BugType::QueenBee, -1, 3)?;
    place(&mut state, Color::Black, BugType::Spider, -1, 4)?;
    place(&mut state, Color::Black, BugType::SoldierAnt, 0, 3)?;
    place(&mut state, Color::Black, BugType::Spider, 1, 3)?;

    Ok(running(state, 6))
}

/// Black to move. The white queen at (1,2) has two free neighbors, (2,1)
/// and (0,2); covering (2,1) first leaves White unable to guard (0,2)
/// against every black piece that can reach it.
pub fn sure_win_in_two_turns() -> Result<GameState, HiveError> {
    let mut state = GameState::base_game().with_turn_limit(10);

    place(&mut state, Color::Black, BugType::QueenBee, 0, 3)?;
    place(&mut state, Color::Black, BugType::SoldierAnt, 0, 4)?;
    place(&mut state, Color::Black, BugType::SoldierAnt, -1, 4)?;
    place(&mut state, Color::Black, BugType::Beetle, -1, 3)?;
    place(&mut state, Color::Black, BugType::SoldierAnt, 1, 3)?;
    place(&mut state, Color::Black, BugType::Grasshopper, 3, 2)?;

    place(&mut state, Color::White, BugType::SoldierAnt, 1, 0)?;
    place(&mut state, Color::White, BugType::Spider, 1, 1)?;
    place(&mut state, Color::White, BugType::QueenBee, 1, 2)?;
    place(&mut state, Color::White, BugType::SoldierAnt, 2, -1)?;
    place(&mut state, Color::White, BugType::Spider, 2, 2)?;
    place(&mut state, Color::White, BugType::SoldierAnt, 3, 1)?;

    Ok(running(state, 6))
}
