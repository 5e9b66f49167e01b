//! Per-creature movement
//!
//! One arm per [`BugType`] for each capability. Target lists are in
//! discovery order (neighbors are walked clockwise from north) without
//! duplicates; the caller strips the origin.

use rustc_hash::FxHashSet;

use crate::board::{Hex, HexBoard};
use crate::pieces::BugType;
use crate::rules::Surface;

/// Steps a Spider must take
const SPIDER_STEPS: usize = 3;

/// Destinations for a token of kind `bug` currently on top of `origin`
pub(crate) fn targets(bug: BugType, origin: Hex, board: &HexBoard) -> Vec<Hex> {
    match bug {
        // TODO: Pill Bug throw (lift an adjacent token over itself), emitted as `by_pillbug` moves
        BugType::QueenBee | BugType::PillBug => step_targets(board, origin, false),
        BugType::Beetle => step_targets(board, origin, true),
        BugType::Grasshopper => grasshopper_targets(board, origin),
        BugType::Spider => spider_targets(board, origin),
        BugType::SoldierAnt => ant_targets(board, origin),
        BugType::LadyBug => lady_bug_targets(board, origin),
        BugType::Mosquito => mosquito_targets(board, origin),
        BugType::Unknown => Vec::new(),
    }
}

/// Creature-specific part of the freedom-to-move check
pub(crate) fn is_free(bug: BugType, origin: Hex, board: &HexBoard) -> bool {
    match bug {
        BugType::QueenBee | BugType::Spider | BugType::SoldierAnt | BugType::PillBug => {
            has_room_to_slide(board, origin)
        }
        BugType::Beetle | BugType::Grasshopper | BugType::LadyBug => true,
        BugType::Mosquito => {
            board.height(origin) > 1
                || copyable_bugs(board, origin)
                    .into_iter()
                    .any(|bug| is_free(bug, origin, board))
        }
        BugType::Unknown => false,
    }
}

// ============================================================================
// GATE RULE
// ============================================================================

/// Two circularly consecutive neighbors are empty
fn has_room_to_slide(board: &HexBoard, origin: Hex) -> bool {
    let around = origin.neighbors();
    (0..6).any(|i| board.is_empty_hex(around[i]) && board.is_empty_hex(around[(i + 1) % 6]))
}

// ============================================================================
// SINGLE STEP (Queen, Pill Bug, Beetle)
// ============================================================================

fn step_targets(board: &HexBoard, origin: Hex, climb: bool) -> Vec<Hex> {
    let surface = Surface::of(board);
    origin
        .neighbors()
        .into_iter()
        .filter(|to| {
            (surface.can_slide(origin, *to) || (climb && surface.can_crawl_up(origin, *to)))
                && surface.one_hive_intact(origin, *to)
        })
        .collect()
}

// ============================================================================
// GRASSHOPPER
// ============================================================================

fn grasshopper_targets(board: &HexBoard, origin: Hex) -> Vec<Hex> {
    let mut result = Vec::new();
    for dir in 0..6 {
        let mut hex = origin.neighbor(dir);
        if board.is_empty_hex(hex) {
            continue;
        }
        while !board.is_empty_hex(hex) {
            hex = hex.neighbor(dir);
        }
        result.push(hex);
    }
    result
}

// ============================================================================
// SPIDER
// ============================================================================

fn spider_targets(board: &HexBoard, origin: Hex) -> Vec<Hex> {
    let surface = Surface::lifting(board, origin);
    let mut path = vec![origin];
    let mut found = Vec::new();
    spider_walk(surface, origin, SPIDER_STEPS, &mut path, &mut found);
    found
}

fn spider_walk(surface: Surface<'_>, at: Hex, remaining: usize, path: &mut Vec<Hex>, found: &mut Vec<Hex>) {
    let here = surface.at(at);
    for next in at.neighbors() {
        if path.contains(&next) || !here.can_slide(at, next) {
            continue;
        }
        if remaining == 1 {
            if !found.contains(&next) {
                found.push(next);
            }
        } else {
            path.push(next);
            spider_walk(surface, next, remaining - 1, path, found);
            path.pop();
        }
    }
}

// ============================================================================
// SOLDIER ANT
// ============================================================================

fn ant_targets(board: &HexBoard, origin: Hex) -> Vec<Hex> {
    let surface = Surface::lifting(board, origin);
    let mut visited = FxHashSet::default();
    visited.insert(origin);
    let mut found = Vec::new();
    ant_walk(surface, origin, &mut visited, &mut found);
    found
}

fn ant_walk(surface: Surface<'_>, at: Hex, visited: &mut FxHashSet<Hex>, found: &mut Vec<Hex>) {
    let here = surface.at(at);
    for next in at.neighbors() {
        if visited.contains(&next) || !here.can_slide(at, next) {
            continue;
        }
        visited.insert(next);
        found.push(next);
        ant_walk(surface, next, visited, found);
    }
}

// ============================================================================
// LADY BUG
// ============================================================================

/// Up onto the hive, one step across the top, down to the ground
fn lady_bug_targets(board: &HexBoard, origin: Hex) -> Vec<Hex> {
    let surface = Surface::lifting(board, origin);
    let start = surface.at(origin);
    let mut found = Vec::new();

    for up in origin.neighbors() {
        if !start.is_filled(up) || !start.can_crawl_up(origin, up) {
            continue;
        }
        let on_up = surface.at(up);
        for across in up.neighbors() {
            if !on_up.is_filled(across)
                || !(on_up.can_slide(up, across) || on_up.can_crawl_up(up, across))
            {
                continue;
            }
            let on_across = surface.at(across);
            for down in across.neighbors() {
                if down != origin
                    && !on_across.is_filled(down)
                    && on_across.can_crawl_down(across, down)
                    && !found.contains(&down)
                {
                    found.push(down);
                }
            }
        }
    }
    found
}

// ============================================================================
// MOSQUITO
// ============================================================================

/// Creature kinds touching `origin` that a ground Mosquito may copy
fn copyable_bugs(board: &HexBoard, origin: Hex) -> Vec<BugType> {
    let mut bugs = Vec::new();
    for token in board.neighbor_tokens(origin) {
        if token.bug != BugType::Mosquito && !bugs.contains(&token.bug) {
            bugs.push(token.bug);
        }
    }
    bugs
}

fn mosquito_targets(board: &HexBoard, origin: Hex) -> Vec<Hex> {
    if board.height(origin) > 1 {
        return step_targets(board, origin, true);
    }
    let mut result = Vec::new();
    for bug in copyable_bugs(board, origin) {
        if !is_free(bug, origin, board) {
            continue;
        }
        for hex in targets(bug, origin, board) {
            if !result.contains(&hex) {
                result.push(hex);
            }
        }
    }
    result
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::board::{Hex, HexBoard};
    use crate::pieces::{Color, Token};
    use crate::rules::Rules;
    use crate::setups;

    fn board_with(layout: &[(&str, i32, i32)]) -> HexBoard {
        setups::board_with(layout).unwrap()
    }

    fn token(s: &str) -> Token {
        s.parse().unwrap()
    }

    /// Black hive used by the gate scenarios: Q(1,0) S(2,0) G(2,1) A(0,1) B(0,2)
    fn gate_layout(extra: (&'static str, i32, i32)) -> HexBoard {
        board_with(&[
            extra,
            ("bQ", 1, 0),
            ("bS1", 2, 0),
            ("bG1", 2, 1),
            ("bA1", 0, 1),
            ("bB1", 0, 2),
        ])
    }

    // ------------------------------------------------------------------
    // Grasshopper
    // ------------------------------------------------------------------

    #[test]
    fn test_grasshopper_jumps_single_token() {
        let board = board_with(&[("wG1", 0, 0), ("bQ", 1, 0)]);
        assert_eq!(Rules.target_hexes(token("wG1"), &board), vec![Hex::new(2, 0)]);
    }

    #[test]
    fn test_grasshopper_jumps_line() {
        let board = board_with(&[("wG1", 0, 0), ("bQ", 0, 1), ("bA1", 0, 2), ("bA2", 0, 3)]);
        assert_eq!(Rules.target_hexes(token("wG1"), &board), vec![Hex::new(0, 4)]);
    }

    #[test]
    fn test_grasshopper_cannot_jump_gaps() {
        let board = board_with(&[
            ("wG1", 0, 2),
            ("bQ", 1, 0),
            ("bS1", 2, 0),
            ("bG1", 2, 1),
            ("bA1", 0, 1),
        ]);
        assert_eq!(Rules.target_hexes(token("wG1"), &board), vec![Hex::new(0, 0)]);
    }

    // ------------------------------------------------------------------
    // Soldier Ant
    // ------------------------------------------------------------------

    #[test]
    fn test_ant_moves_around_hive() {
        let board = board_with(&[("wA1", 0, 0), ("bQ", 1, 0)]);
        let targets = Rules.target_hexes(token("wA1"), &board);
        assert_eq!(
            targets,
            vec![Hex::new(1, -1), Hex::new(2, -1), Hex::new(2, 0), Hex::new(1, 1), Hex::new(0, 1)]
        );
    }

    #[test]
    fn test_ant_respects_gates() {
        let board = gate_layout(("wA1", 0, 0));
        let targets = Rules.target_hexes(token("wA1"), &board);
        assert_eq!(targets.len(), 11);
        assert!(!targets.contains(&Hex::new(1, 1)));
        assert!(!targets.contains(&Hex::new(0, 0)));
    }

    #[test]
    fn test_ant_not_free_when_surrounded_by_gate() {
        let board = board_with(&[("wA1", 0, 0), ("bQ", 0, -1), ("bA1", 1, 0), ("bA2", -1, 1)]);
        assert!(!Rules.is_free_to_move(token("wA1"), &board));
    }

    #[test]
    fn test_ant_free_when_almost_surrounded() {
        let board = board_with(&[("wA1", 0, 0), ("bQ", 0, -1), ("bA1", 1, -1), ("bA2", 1, 0)]);
        assert!(Rules.is_free_to_move(token("wA1"), &board));
    }

    // ------------------------------------------------------------------
    // Beetle
    // ------------------------------------------------------------------

    #[test]
    fn test_beetle_steps_and_climbs() {
        let board = board_with(&[("wB1", 0, 0), ("bA1", 1, -1)]);
        assert_eq!(
            Rules.target_hexes(token("wB1"), &board),
            vec![Hex::new(0, -1), Hex::new(1, -1), Hex::new(1, 0)]
        );
    }

    #[test]
    fn test_beetle_blocked_by_high_gate() {
        let board = board_with(&[
            ("wB1", 0, 0),
            ("bA1", 0, -1),
            ("bB1", 0, -1),
            ("bA2", 1, -1),
            ("wA1", 1, 0),
            ("wB2", 1, 0),
        ]);
        let targets = Rules.target_hexes(token("wB1"), &board);
        assert_eq!(targets, vec![Hex::new(0, -1), Hex::new(1, 0), Hex::new(0, 1), Hex::new(-1, 0)]);
        assert!(!targets.contains(&Hex::new(1, -1)));
    }

    /// Mover at (0,0) touching a single neighbor at (1,0); the rest of the
    /// hive curls around the north without reaching (1,-1) or (-1,0)
    fn open_gap_layout(mover: &'static str, neighbor: &'static str) -> HexBoard {
        board_with(&[
            (mover, 0, 0),
            (neighbor, 1, 0),
            ("bQ", 2, -1),
            ("bA1", 2, -2),
            ("bA2", 1, -2),
            ("bA3", 0, -2),
        ])
    }

    #[test]
    fn test_beetle_cannot_cross_open_gap() {
        let board = open_gap_layout("wB1", "wQ");
        let targets = Rules.target_hexes(token("wB1"), &board);
        assert!(!targets.contains(&Hex::new(0, -1)));
        assert_eq!(targets, vec![Hex::new(1, -1), Hex::new(1, 0), Hex::new(0, 1)]);
    }

    #[test]
    fn test_mosquito_as_beetle_cannot_cross_open_gap() {
        let board = open_gap_layout("wM", "bB1");
        let targets = Rules.target_hexes(token("wM"), &board);
        assert_eq!(targets, vec![Hex::new(1, -1), Hex::new(1, 0), Hex::new(0, 1)]);
    }

    #[test]
    fn test_beetle_on_top_moves_in_all_directions() {
        let board = board_with(&[("bQ", 0, 0), ("wB1", 0, 0), ("wQ", 1, 0)]);
        let targets = Rules.target_hexes(token("wB1"), &board);
        assert_eq!(targets.len(), 6);
    }

    // ------------------------------------------------------------------
    // Queen
    // ------------------------------------------------------------------

    #[test]
    fn test_queen_single_step() {
        let board = board_with(&[("wQ", 0, 0), ("bA1", 1, -1)]);
        assert_eq!(Rules.target_hexes(token("wQ"), &board), vec![Hex::new(0, -1), Hex::new(1, 0)]);
    }

    // ------------------------------------------------------------------
    // Spider
    // ------------------------------------------------------------------

    #[test]
    fn test_spider_three_steps() {
        let board = board_with(&[("wS1", 0, 0), ("bQ", 1, 0)]);
        assert_eq!(Rules.target_hexes(token("wS1"), &board), vec![Hex::new(2, 0)]);
    }

    #[test]
    fn test_spider_respects_gates() {
        let board = gate_layout(("wS1", 0, 3));
        let mut targets = Rules.target_hexes(token("wS1"), &board);
        targets.sort();
        assert_eq!(targets, vec![Hex::new(-1, 1), Hex::new(3, 1)]);
    }

    // ------------------------------------------------------------------
    // Mosquito
    // ------------------------------------------------------------------

    #[test]
    fn test_mosquito_copying_mosquito_does_nothing() {
        let mut board = board_with(&[("wM", 0, 0), ("bM", 1, 0)]);
        assert!(!Rules.mimic(token("wM"), token("bM"), &mut board));
        assert!(Rules.target_hexes(token("wM"), &board).is_empty());
    }

    #[test]
    fn test_mosquito_copies_queen() {
        let mut board = board_with(&[("wM", 0, 0), ("bQ", 1, 0)]);
        assert!(Rules.mimic(token("wM"), token("bQ"), &mut board));
        assert_eq!(Rules.target_hexes(token("wM"), &board), vec![Hex::new(1, -1), Hex::new(0, 1)]);
    }

    #[test]
    fn test_mosquito_uses_touching_creatures() {
        let board = board_with(&[("wM", 0, 0), ("bG1", 1, 0)]);
        assert_eq!(Rules.target_hexes(token("wM"), &board), vec![Hex::new(2, 0)]);
    }

    #[test]
    fn test_mosquito_on_top_has_no_mimic_list() {
        let board = board_with(&[("bQ", 0, 0), ("wM", 0, 0), ("wA1", 1, 0)]);
        assert!(Rules.mimic_list(token("wM"), &board).is_empty());
        assert_eq!(Rules.target_hexes(token("wM"), &board).len(), 6);
    }

    // ------------------------------------------------------------------
    // Lady Bug
    // ------------------------------------------------------------------

    #[test]
    fn test_lady_bug_needs_two_tokens_to_walk_on() {
        let board = board_with(&[("wL", 0, 0), ("bQ", 1, 0)]);
        assert!(Rules.target_hexes(token("wL"), &board).is_empty());
    }

    #[test]
    fn test_lady_bug_over_two_tokens() {
        let board = board_with(&[("wL", 0, 0), ("bQ", 1, 0), ("bA1", 2, 0)]);
        let targets = Rules.target_hexes(token("wL"), &board);
        assert!(!targets.is_empty());
        assert!(!targets.contains(&Hex::new(0, 0)));
        for t in &targets {
            assert!(board.is_empty_hex(*t));
            assert!(t.distance_to(Hex::new(2, 0)) == 1 || t.distance_to(Hex::new(1, 0)) == 1);
        }
        assert!(targets.contains(&Hex::new(3, 0)));
    }

    // ------------------------------------------------------------------
    // Pill Bug and unknown creatures
    // ------------------------------------------------------------------

    #[test]
    fn test_pill_bug_moves_like_queen() {
        let board = board_with(&[("wP", 0, 0), ("bA1", 1, -1)]);
        assert_eq!(Rules.target_hexes(token("wP"), &board), vec![Hex::new(0, -1), Hex::new(1, 0)]);
        assert!(token("wP").bug.can_move_others());
    }

    #[test]
    fn test_unknown_bug_never_moves() {
        let mut board = HexBoard::new();
        let odd = Token::new(Color::White, crate::pieces::BugType::Unknown, 1);
        board.add_token(odd, Hex::new(0, 0)).unwrap();
        board.add_token(token("bQ"), Hex::new(1, 0)).unwrap();
        assert!(!Rules.is_free_to_move(odd, &board));
        assert!(Rules.target_hexes(odd, &board).is_empty());
    }
}
