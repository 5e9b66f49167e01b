//! Players, commands and the turn engine

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::board::{Hex, HexBoard};
use crate::error::HiveError;
use crate::pieces::{BugType, Color, Token, BASE_SUPPLY, EXPANSION_SUPPLY};
use crate::position::{StandardPositionMode, SIDE_TO_MOVE};
use crate::rules::Rules;

// ============================================================================
// CONSTANTS
// ============================================================================

/// A player's queen must be played on this move at the latest (0-based)
const QUEEN_DEADLINE: u32 = 3;

/// Repeated destinations each player needs before the game is drawn
const REPEATS_BEFORE_DRAW: u32 = 3;

/// Log distance between a move and the same player's move it repeats
const REPEAT_DISTANCE: usize = 4;

// ============================================================================
// STATUS
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    TurnLimitReached,
    Draw,
    BlackWins,
    WhiteWins,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::NotStarted | GameStatus::InProgress)
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::WhiteWins => Some(Color::White),
            GameStatus::BlackWins => Some(Color::Black),
            _ => None,
        }
    }
}

// ============================================================================
// PLAYER
// ============================================================================

/// One side of the game and its supply of unplayed tokens
#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub color: Color,
    supply: Vec<Token>,
    /// Every token the player started with
    starting: Vec<Token>,
    pub moves: u32,
    pub passes: u32,
    pub think_time: Duration,
}

impl Player {
    /// Player with an empty supply
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            supply: Vec::new(),
            starting: Vec::new(),
            moves: 0,
            passes: 0,
            think_time: Duration::ZERO,
        }
    }

    pub fn fill_base_supply(&mut self) {
        self.fill(&BASE_SUPPLY);
    }

    /// Add the Mosquito, Lady Bug and Pill Bug
    pub fn fill_expansions(&mut self) {
        self.fill(&EXPANSION_SUPPLY);
    }

    fn fill(&mut self, table: &[(BugType, u8)]) {
        for &(bug, count) in table {
            for number in 1..=count {
                let token = Token::new(self.color, bug, number);
                if !self.starting.contains(&token) {
                    self.starting.push(token);
                    self.supply.push(token);
                }
            }
        }
    }

    /// Put every token back and zero the counters
    pub fn reset(&mut self) {
        self.supply = self.starting.clone();
        self.moves = 0;
        self.passes = 0;
        self.think_time = Duration::ZERO;
    }

    pub fn supply(&self) -> &[Token] {
        &self.supply
    }

    pub fn starting_bugs(&self) -> usize {
        self.starting.len()
    }

    /// Lowest numbered token of a kind still in supply
    pub fn peek_supply(&self, bug: BugType) -> Option<Token> {
        self.supply
            .iter()
            .filter(|t| t.bug == bug)
            .min_by_key(|t| t.number)
            .copied()
    }

    /// Take the lowest numbered token of a kind out of supply
    pub fn take_from_supply(&mut self, bug: BugType) -> Option<Token> {
        let token = self.peek_supply(bug)?;
        self.remove_from_supply(token);
        Some(token)
    }

    pub fn remove_from_supply(&mut self, token: Token) -> bool {
        match self.supply.iter().position(|t| *t == token) {
            Some(i) => {
                self.supply.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn return_to_supply(&mut self, token: Token) {
        self.supply.push(token);
    }

    /// Distinct creature kinds left in supply, in supply order
    pub fn supply_bugs(&self) -> Vec<BugType> {
        let mut bugs = Vec::new();
        for token in &self.supply {
            if !bugs.contains(&token.bug) {
                bugs.push(token.bug);
            }
        }
        bugs
    }

    /// The player's queen, if the supply ever held one
    pub fn queen(&self) -> Option<Token> {
        let queen = Token::queen(self.color);
        self.starting.contains(&queen).then_some(queen)
    }

    pub fn has_placed_queen(&self) -> bool {
        self.queen().map_or(false, |q| !self.supply.contains(&q))
    }

    /// The queen has to be placed with this move
    pub fn is_queen_due(&self) -> bool {
        self.moves == QUEEN_DEADLINE && self.queen().is_some() && !self.has_placed_queen()
    }

    pub fn turns(&self) -> u32 {
        self.moves
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// One move. `execute` and `undo` are exact inverses on the state the
/// command was generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCommand {
    Pass,
    /// Token from supply onto the board
    Place { token: Token, to: Hex },
    /// Top token of `from` onto `to`
    Move {
        token: Token,
        from: Hex,
        to: Hex,
        by_pillbug: bool,
    },
}

impl GameCommand {
    pub fn place(token: Token, to: Hex) -> Self {
        GameCommand::Place { token, to }
    }

    pub fn movement(token: Token, from: Hex, to: Hex) -> Self {
        GameCommand::Move { token, from, to, by_pillbug: false }
    }

    pub fn token(&self) -> Option<Token> {
        match *self {
            GameCommand::Pass => None,
            GameCommand::Place { token, .. } | GameCommand::Move { token, .. } => Some(token),
        }
    }

    /// Origin hex; `None` for supply and PASS
    pub fn from(&self) -> Option<Hex> {
        match *self {
            GameCommand::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Destination hex; `None` for PASS
    pub fn to(&self) -> Option<Hex> {
        match *self {
            GameCommand::Pass => None,
            GameCommand::Place { to, .. } | GameCommand::Move { to, .. } => Some(to),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, GameCommand::Pass)
    }

    pub fn is_placement(&self) -> bool {
        matches!(self, GameCommand::Place { .. })
    }

    /// Apply to the board and supply, count the move and hand the turn over
    pub fn execute(&self, state: &mut GameState) -> Result<(), HiveError> {
        match *self {
            GameCommand::Pass => {}
            GameCommand::Place { token, to } => {
                if !state.players[token.color.index()].remove_from_supply(token) {
                    return Err(HiveError::invariant(format!("{} is not in supply", token)));
                }
                state.board.add_token(token, to)?;
            }
            GameCommand::Move { token, from, to, .. } => {
                let moved = state.board.move_token(from, to)?;
                if moved != token {
                    state.board.move_token(to, from)?;
                    return Err(HiveError::invariant(format!(
                        "expected {} on top of {}, found {}",
                        token, from, moved
                    )));
                }
            }
        }
        let player = &mut state.players[state.active.index()];
        player.moves += 1;
        if self.is_pass() {
            player.passes += 1;
        }
        state.active = state.active.opponent();
        Ok(())
    }

    /// Revert a command that was the last one executed on `state`
    pub fn undo(&self, state: &mut GameState) -> Result<(), HiveError> {
        state.active = state.active.opponent();
        let player = &mut state.players[state.active.index()];
        player.moves = player
            .moves
            .checked_sub(1)
            .ok_or_else(|| HiveError::invariant(format!("undo of {} with no moves counted", self)))?;
        if self.is_pass() {
            player.passes = player.passes.saturating_sub(1);
        }

        match *self {
            GameCommand::Pass => {}
            GameCommand::Place { token, to } => {
                let removed = state.board.remove_token(to)?;
                if removed != token {
                    return Err(HiveError::invariant(format!(
                        "undo of {} removed {} instead",
                        self, removed
                    )));
                }
                state.players[token.color.index()].return_to_supply(token);
            }
            GameCommand::Move { from, to, .. } => {
                state.board.move_token(to, from)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for GameCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameCommand::Pass => write!(f, "PASS"),
            GameCommand::Place { token, to } => write!(f, "{}: SUPPLY -> {}", token, to),
            GameCommand::Move { token, from, to, .. } => write!(f, "{}: {} -> {}", token, from, to),
        }
    }
}

/// Anything that can choose the active player's next command
pub trait CommandProvider {
    fn command(&mut self, state: &mut GameState) -> Result<GameCommand, HiveError>;
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Board, players and the log of executed commands.
///
/// Searches mutate one shared state in place: apply a command with
/// [`GameState::scoped`], look deeper, and let the guard undo it.
#[derive(Clone, Debug)]
pub struct GameState {
    board: HexBoard,
    players: [Player; 2],
    active: Color,
    log: Vec<GameCommand>,
    /// Duplicate counters before each logged command, for take-backs
    duplicate_log: Vec<[u32; 2]>,
    duplicates: [u32; 2],
    pub(crate) status: GameStatus,
    turn_limit: Option<u32>,
    /// Next log entry to replay, while replaying
    replay: Option<usize>,
    rules: Rules,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(mut white: Player, mut black: Player) -> Self {
        white.color = Color::White;
        black.color = Color::Black;
        Self {
            board: HexBoard::new(),
            players: [white, black],
            active: Color::White,
            log: Vec::new(),
            duplicate_log: Vec::new(),
            duplicates: [0; 2],
            status: GameStatus::NotStarted,
            turn_limit: None,
            replay: None,
            rules: Rules::new(),
        }
    }

    /// Two players with the base supply
    pub fn base_game() -> Self {
        let mut white = Player::new("White", Color::White);
        let mut black = Player::new("Black", Color::Black);
        white.fill_base_supply();
        black.fill_base_supply();
        Self::new(white, black)
    }

    /// Draw after this many turns per player; 0 disables the limit
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = (limit > 0).then_some(limit);
        self
    }

    pub fn with_standard_position(mut self, mode: StandardPositionMode) -> Self {
        self.board = HexBoard::with_mode(mode);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    /// Direct board access for setting up positions
    pub fn board_mut(&mut self) -> &mut HexBoard {
        &mut self.board
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    pub fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.index()]
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    pub fn active_player(&self) -> &Player {
        self.player(self.active)
    }

    pub fn other_player(&self) -> &Player {
        self.player(self.active.opponent())
    }

    pub fn set_active(&mut self, color: Color) {
        self.active = color;
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn_limit(&self) -> Option<u32> {
        self.turn_limit
    }

    /// Executed commands, oldest first
    pub fn moves(&self) -> &[GameCommand] {
        &self.log
    }

    pub fn duplicate_moves(&self, color: Color) -> u32 {
        self.duplicates[color.index()]
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    /// Board key with the side to move folded in
    pub fn zobrist_key(&self) -> u64 {
        match self.active {
            Color::White => self.board.zobrist_key(),
            Color::Black => self.board.zobrist_key() ^ SIDE_TO_MOVE,
        }
    }

    /// Command `color` played on its `turn`-th turn (1-based)
    pub fn get_move(&self, color: Color, turn: usize) -> Option<GameCommand> {
        if turn == 0 {
            return None;
        }
        let index = (turn - 1) * 2 + color.index();
        self.log.get(index).copied()
    }

    // ========================================================================
    // GAME FLOW
    // ========================================================================

    /// Clear the board, refill supplies and hand the first move to White
    pub fn start(&mut self) {
        if self.status == GameStatus::InProgress {
            return;
        }
        self.board.clear();
        for player in &mut self.players {
            player.reset();
        }
        self.log.clear();
        self.duplicate_log.clear();
        self.duplicates = [0; 2];
        self.replay = None;
        self.active = Color::White;
        self.status = GameStatus::InProgress;
        debug!(
            white = %self.players[0].name,
            black = %self.players[1].name,
            "game started"
        );
    }

    /// Validate and execute one command for the active player
    pub fn continue_game(&mut self, command: GameCommand) -> Result<GameStatus, HiveError> {
        if self.replay.is_some() {
            return Err(HiveError::ReplayActive);
        }
        if self.status != GameStatus::InProgress {
            return Err(HiveError::NotRunning(self.status));
        }
        self.check_legal(command)?;

        self.track_duplicates(command);
        if let Err(e) = command.execute(self) {
            self.restore_duplicates();
            return Err(e);
        }
        self.log.push(command);
        debug!(player = %self.active.opponent(), command = %command, "executed");

        if self.is_end_of_game() {
            debug!(status = ?self.status, moves = self.log.len(), "game over");
        }
        Ok(self.status)
    }

    /// Ask `provider` once for a command, charging its think time
    pub fn continue_with<P>(&mut self, provider: &mut P) -> Result<GameStatus, HiveError>
    where
        P: CommandProvider + ?Sized,
    {
        if self.replay.is_some() {
            return Err(HiveError::ReplayActive);
        }
        if self.status != GameStatus::InProgress {
            return Err(HiveError::NotRunning(self.status));
        }
        let started = Instant::now();
        let command = provider.command(self)?;
        self.players[self.active.index()].think_time += started.elapsed();
        self.continue_game(command)
    }

    /// Run a full game between two providers
    pub fn play<W, B>(&mut self, white: &mut W, black: &mut B) -> Result<GameStatus, HiveError>
    where
        W: CommandProvider + ?Sized,
        B: CommandProvider + ?Sized,
    {
        self.start();
        while self.status == GameStatus::InProgress {
            match self.active {
                Color::White => self.continue_with(&mut *white)?,
                Color::Black => self.continue_with(&mut *black)?,
            };
        }
        Ok(self.status)
    }

    /// Undo and drop the last logged command
    pub fn take_back(&mut self) -> Result<Option<GameCommand>, HiveError> {
        if self.replay.is_some() {
            return Err(HiveError::ReplayActive);
        }
        let Some(command) = self.log.pop() else {
            return Ok(None);
        };
        command.undo(self)?;
        self.restore_duplicates();
        if self.status.is_terminal() {
            self.status = GameStatus::InProgress;
        }
        Ok(Some(command))
    }

    // ========================================================================
    // LEGALITY
    // ========================================================================

    pub fn is_legal_command(&self, command: GameCommand) -> bool {
        self.check_legal(command).is_ok()
    }

    fn check_legal(&self, command: GameCommand) -> Result<(), HiveError> {
        let illegal = |reason: &'static str| {
            Err(HiveError::IllegalCommand { command: command.to_string(), reason })
        };
        let player = self.active_player();

        if let Some(token) = command.token() {
            if token.color != self.active {
                return illegal("token belongs to the other player");
            }
        }
        if player.is_queen_due() {
            let places_queen =
                matches!(command, GameCommand::Place { token, .. } if Some(token) == player.queen());
            if !places_queen {
                return illegal("queen must be placed by the fourth turn");
            }
        }
        match command {
            GameCommand::Pass => Ok(()),
            GameCommand::Place { token, .. } => {
                if player.supply().contains(&token) {
                    Ok(())
                } else {
                    illegal("token is not in supply")
                }
            }
            GameCommand::Move { token, from, .. } => {
                if !player.has_placed_queen() {
                    illegal("no movement before the queen is placed")
                } else if self.board.top(from) != Some(token) {
                    illegal("token is not on top of the origin stack")
                } else {
                    Ok(())
                }
            }
        }
    }

    // ========================================================================
    // END OF GAME
    // ========================================================================

    /// Counts a repeat when the destination matches the active player's
    /// previous move. Called before the command is executed.
    fn track_duplicates(&mut self, command: GameCommand) {
        self.duplicate_log.push(self.duplicates);
        let len = self.log.len();
        if len < REPEAT_DISTANCE {
            return;
        }
        let earlier = self.log[len - REPEAT_DISTANCE];
        let counter = &mut self.duplicates[self.active.index()];
        if earlier.to() == command.to() {
            *counter += 1;
        } else {
            *counter = 0;
        }
    }

    fn restore_duplicates(&mut self) {
        if let Some(previous) = self.duplicate_log.pop() {
            self.duplicates = previous;
        }
    }

    pub fn is_turn_limit_reached(&self) -> bool {
        self.turn_limit.map_or(false, |limit| {
            self.players[0].turns() + self.players[1].turns() >= 2 * limit
        })
    }

    pub fn is_forced_draw(&self) -> bool {
        self.duplicates.iter().all(|d| *d >= REPEATS_BEFORE_DRAW)
    }

    /// Result the current position would end the game with, if any
    pub fn end_condition(&self) -> Option<GameStatus> {
        let white_lost = self.rules.is_queen_surrounded(Color::White, &self.board);
        let black_lost = self.rules.is_queen_surrounded(Color::Black, &self.board);

        if self.is_turn_limit_reached() {
            Some(GameStatus::TurnLimitReached)
        } else if white_lost && black_lost {
            Some(GameStatus::Draw)
        } else if white_lost {
            Some(GameStatus::BlackWins)
        } else if black_lost {
            Some(GameStatus::WhiteWins)
        } else if self.is_forced_draw() {
            Some(GameStatus::Draw)
        } else {
            None
        }
    }

    /// Record the end of the game if it has been reached
    pub fn is_end_of_game(&mut self) -> bool {
        match self.end_condition() {
            Some(status) => {
                self.status = status;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // SEARCH SUPPORT
    // ========================================================================

    /// Execute `command` without logging it; dropping the guard undoes it
    pub fn scoped(&mut self, command: GameCommand) -> Result<AppliedCommand<'_>, HiveError> {
        command.execute(self)?;
        Ok(AppliedCommand { state: self, command })
    }

    // ========================================================================
    // REPLAY
    // ========================================================================

    /// Freeze the log and rewind the board to the first move
    pub fn enter_replay(&mut self) -> Result<(), HiveError> {
        if self.replay.is_some() {
            return Ok(());
        }
        self.replay = Some(self.log.len());
        while self.backwards()?.is_some() {}
        Ok(())
    }

    /// Re-apply the next logged command
    pub fn forward(&mut self) -> Result<Option<GameCommand>, HiveError> {
        let cursor = self.replay.ok_or(HiveError::NotReplaying)?;
        let Some(&command) = self.log.get(cursor) else {
            return Ok(None);
        };
        command.execute(self)?;
        self.replay = Some(cursor + 1);
        Ok(Some(command))
    }

    /// Undo the previous logged command
    pub fn backwards(&mut self) -> Result<Option<GameCommand>, HiveError> {
        let cursor = self.replay.ok_or(HiveError::NotReplaying)?;
        if cursor == 0 {
            return Ok(None);
        }
        let command = self.log[cursor - 1];
        command.undo(self)?;
        self.replay = Some(cursor - 1);
        Ok(Some(command))
    }

    /// Fast-forward to the end of the log and resume normal play
    pub fn leave_replay(&mut self) -> Result<(), HiveError> {
        if self.replay.is_none() {
            return Ok(());
        }
        while self.forward()?.is_some() {}
        self.replay = None;
        Ok(())
    }
}

// ============================================================================
// SCOPED COMMAND
// ============================================================================

/// A command applied to a [`GameState`] for as long as this guard lives
pub struct AppliedCommand<'a> {
    state: &'a mut GameState,
    command: GameCommand,
}

impl AppliedCommand<'_> {
    pub fn command(&self) -> GameCommand {
        self.command
    }
}

impl Deref for AppliedCommand<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl DerefMut for AppliedCommand<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl Drop for AppliedCommand<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.command.undo(self.state) {
            error!(command = %self.command, error = %e, "failed to undo scoped command");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setups;

    fn token(s: &str) -> Token {
        s.parse().unwrap()
    }

    fn place(id: &str, q: i32, r: i32) -> GameCommand {
        GameCommand::place(token(id), Hex::new(q, r))
    }

    fn step(id: &str, from: (i32, i32), to: (i32, i32)) -> GameCommand {
        GameCommand::movement(token(id), Hex::new(from.0, from.1), Hex::new(to.0, to.1))
    }

    fn started() -> GameState {
        let mut state = GameState::base_game();
        state.start();
        state
    }

    fn play_all(state: &mut GameState, commands: &[GameCommand]) {
        for c in commands {
            state.continue_game(*c).unwrap();
        }
    }

    struct Scripted(Vec<GameCommand>);

    impl CommandProvider for Scripted {
        fn command(&mut self, _state: &mut GameState) -> Result<GameCommand, HiveError> {
            Ok(self.0.remove(0))
        }
    }

    #[test]
    fn test_player_supply() {
        let mut player = Player::new("p", Color::White);
        player.fill_base_supply();
        assert_eq!(player.starting_bugs(), 11);
        assert!(!player.has_placed_queen());
        assert_eq!(player.take_from_supply(BugType::SoldierAnt), Some(token("wA1")));
        assert_eq!(player.take_from_supply(BugType::SoldierAnt), Some(token("wA2")));
        player.return_to_supply(token("wA1"));
        assert_eq!(player.peek_supply(BugType::SoldierAnt), Some(token("wA1")));
        player.take_from_supply(BugType::QueenBee);
        assert!(player.has_placed_queen());

        player.fill_expansions();
        assert_eq!(player.starting_bugs(), 14);
        player.reset();
        assert_eq!(player.supply().len(), 14);
    }

    #[test]
    fn test_command_display() {
        assert_eq!(place("wA1", 0, 1).to_string(), "wA1: SUPPLY -> (0, 1)");
        assert_eq!(step("bQ", (1, 0), (1, -1)).to_string(), "bQ: (1, 0) -> (1, -1)");
        assert_eq!(GameCommand::Pass.to_string(), "PASS");
    }

    #[test]
    fn test_new_game_not_running() {
        let mut state = GameState::base_game();
        assert_eq!(state.status(), GameStatus::NotStarted);
        assert_eq!(
            state.continue_game(GameCommand::Pass),
            Err(HiveError::NotRunning(GameStatus::NotStarted))
        );
        state.start();
        assert_eq!(state.status(), GameStatus::InProgress);
        assert_eq!(state.active_color(), Color::White);
    }

    #[test]
    fn test_execute_undo_restores_state() {
        let mut state = started();
        play_all(&mut state, &[place("wQ", 0, 0), place("bQ", 1, 0), place("wA1", -1, 0)]);

        let key = state.zobrist_key();
        let filled = state.board().filled_hexes();
        let supply = state.player(Color::Black).supply().to_vec();

        for command in [place("bA1", 2, 0), step("bQ", (1, 0), (1, -1)), GameCommand::Pass] {
            {
                let applied = state.scoped(command).unwrap();
                assert_eq!(applied.active_color(), Color::White);
                assert_ne!(applied.zobrist_key(), key);
            }
            assert_eq!(state.zobrist_key(), key);
            assert_eq!(state.board().filled_hexes(), filled);
            assert_eq!(state.player(Color::Black).supply(), supply.as_slice());
            assert_eq!(state.active_color(), Color::Black);
            assert_eq!(state.player(Color::Black).moves, 1);
        }
    }

    #[test]
    fn test_pass_counts_as_move() {
        let mut state = started();
        state.continue_game(GameCommand::Pass).unwrap();
        assert_eq!(state.player(Color::White).moves, 1);
        assert_eq!(state.player(Color::White).passes, 1);
        assert_eq!(state.active_color(), Color::Black);
    }

    #[test]
    fn test_filling_last_neighbor_wins() {
        let mut state = started();
        play_all(
            &mut state,
            &[
                place("wQ", 0, -1),
                place("bQ", 0, 0),
                place("wA1", 1, -1),
                place("bA1", 1, 0),
                place("wA2", 0, 1),
                place("bA2", -1, 1),
                place("wB1", -1, -1),
                GameCommand::Pass,
            ],
        );
        assert_eq!(state.status(), GameStatus::InProgress);
        let status = state.continue_game(step("wB1", (-1, -1), (-1, 0))).unwrap();
        assert_eq!(status, GameStatus::WhiteWins);
        assert!(status.is_terminal());
        assert_eq!(status.winner(), Some(Color::White));
        assert!(matches!(state.continue_game(GameCommand::Pass), Err(HiveError::NotRunning(_))));
    }

    #[test]
    fn test_queen_deadline() {
        let mut state = started();
        play_all(
            &mut state,
            &[
                place("wA1", 0, 0),
                place("bA1", 1, 0),
                place("wA2", -1, 0),
                place("bA2", 2, 0),
                place("wA3", -2, 0),
                place("bA3", 3, 0),
            ],
        );
        assert!(state.active_player().is_queen_due());
        assert!(matches!(
            state.continue_game(place("wG1", -3, 0)),
            Err(HiveError::IllegalCommand { .. })
        ));
        assert!(!state.is_legal_command(GameCommand::Pass));
        assert!(state.is_legal_command(place("wQ", -3, 0)));
        state.continue_game(place("wQ", -3, 0)).unwrap();
        assert!(state.player(Color::White).has_placed_queen());
    }

    #[test]
    fn test_no_movement_before_queen() {
        let mut state = started();
        play_all(&mut state, &[place("wA1", 0, 0), place("bA1", 1, 0)]);
        assert!(!state.is_legal_command(step("wA1", (0, 0), (1, -1))));
        assert!(state.is_legal_command(GameCommand::Pass));
    }

    #[test]
    fn test_wrong_color_and_missing_token() {
        let mut state = started();
        assert!(!state.is_legal_command(place("bQ", 0, 0)));
        play_all(&mut state, &[place("wQ", 0, 0), place("bQ", 1, 0)]);
        assert!(!state.is_legal_command(place("wQ", -1, 0)));
        assert!(!state.is_legal_command(step("wA1", (0, 0), (1, -1))));
    }

    #[test]
    fn test_turn_limit() {
        let mut state = GameState::base_game().with_turn_limit(1);
        state.start();
        state.continue_game(place("wQ", 0, 0)).unwrap();
        let status = state.continue_game(place("bQ", 1, 0)).unwrap();
        assert_eq!(status, GameStatus::TurnLimitReached);
    }

    #[test]
    fn test_forced_draw() {
        let mut state = started();
        play_all(
            &mut state,
            &[place("wQ", 0, 0), place("bQ", 1, 0), place("wA1", -1, 0), place("bA1", 2, 0)],
        );
        let shuffle = [
            step("wA1", (-1, 0), (-1, 1)),
            step("bA1", (2, 0), (2, -1)),
            step("wA1", (-1, 1), (-1, 0)),
            step("bA1", (2, -1), (2, 0)),
        ];
        play_all(&mut state, &shuffle);
        play_all(&mut state, &shuffle[..2]);
        assert_eq!(state.duplicate_moves(Color::White), 2);
        assert_eq!(state.duplicate_moves(Color::Black), 2);
        play_all(&mut state, &shuffle[2..3]);
        assert_eq!(state.status(), GameStatus::InProgress);
        state.continue_game(shuffle[3]).unwrap();
        assert_eq!(state.status(), GameStatus::Draw);
    }

    #[test]
    fn test_take_back() {
        let mut state = started();
        play_all(&mut state, &[place("wQ", 0, 0), place("bQ", 1, 0)]);
        let key = state.zobrist_key();
        state.continue_game(place("wA1", -1, 0)).unwrap();
        assert_eq!(state.take_back().unwrap(), Some(place("wA1", -1, 0)));
        assert_eq!(state.zobrist_key(), key);
        assert_eq!(state.moves().len(), 2);
        assert_eq!(state.active_color(), Color::White);
    }

    #[test]
    fn test_replay() {
        let mut state = started();
        let commands = [place("wQ", 0, 0), place("bQ", 1, 0), place("wA1", -1, 0), place("bA1", 2, 0)];
        play_all(&mut state, &commands);
        let key = state.zobrist_key();

        state.enter_replay().unwrap();
        assert!(state.is_replaying());
        assert_eq!(state.board().token_count(), 0);
        assert_eq!(state.backwards().unwrap(), None);

        assert_eq!(state.forward().unwrap(), Some(commands[0]));
        assert_eq!(state.forward().unwrap(), Some(commands[1]));
        assert_eq!(state.board().token_count(), 2);
        assert_eq!(state.continue_game(GameCommand::Pass), Err(HiveError::ReplayActive));

        state.leave_replay().unwrap();
        assert!(!state.is_replaying());
        assert_eq!(state.board().token_count(), 4);
        assert_eq!(state.zobrist_key(), key);
        assert_eq!(state.forward(), Err(HiveError::NotReplaying));
    }

    #[test]
    fn test_get_move() {
        let mut state = started();
        let commands = [place("wQ", 0, 0), place("bQ", 1, 0), place("wA1", -1, 0)];
        play_all(&mut state, &commands);
        assert_eq!(state.get_move(Color::White, 1), Some(commands[0]));
        assert_eq!(state.get_move(Color::Black, 1), Some(commands[1]));
        assert_eq!(state.get_move(Color::White, 2), Some(commands[2]));
        assert_eq!(state.get_move(Color::Black, 2), None);
        assert_eq!(state.get_move(Color::White, 0), None);
    }

    #[test]
    fn test_side_to_move_in_key() {
        let mut state = started();
        let white_key = state.zobrist_key();
        state.set_active(Color::Black);
        assert_eq!(state.zobrist_key(), white_key ^ SIDE_TO_MOVE);
    }

    #[test]
    fn test_continue_with_provider() {
        let mut state = started();
        let mut white = Scripted(vec![place("wQ", 0, 0)]);
        let mut black = Scripted(vec![place("bQ", 1, 0)]);
        state.continue_with(&mut white).unwrap();
        state.continue_with(&mut black).unwrap();
        assert_eq!(state.moves().len(), 2);
        assert!(state.player(Color::Black).has_placed_queen());
    }

    #[test]
    fn test_play_until_turn_limit() {
        let mut state = GameState::base_game().with_turn_limit(2);
        let mut white = Scripted(vec![place("wQ", 0, 0), GameCommand::Pass]);
        let mut black = Scripted(vec![place("bQ", 1, 0), GameCommand::Pass]);
        let status = state.play(&mut white, &mut black).unwrap();
        assert_eq!(status, GameStatus::TurnLimitReached);
        assert_eq!(state.player(Color::White).passes, 1);
    }

    #[test]
    fn test_sure_win_fixture_is_one_move_from_the_end() {
        let mut state = setups::sure_win_in_one_turn().unwrap();
        assert_eq!(state.active_color(), Color::Black);
        let spider = state.board().top(Hex::new(1, 3)).unwrap();
        let winning = GameCommand::movement(spider, Hex::new(1, 3), Hex::new(1, 1));
        let applied = state.scoped(winning).unwrap();
        assert_eq!(applied.end_condition(), Some(GameStatus::BlackWins));
    }
}
