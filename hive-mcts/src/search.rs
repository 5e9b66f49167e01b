//! MCTS Search Loop
//!
//! Each iteration walks the shared state from the root:
//! 1. Selection - descend through fully expanded nodes by the tree policy
//! 2. Expansion - add one untried command as a new child
//! 3. Simulation - random playout from the new child
//! 4. Backpropagation - add the result to every node on the way back up,
//!    undoing the commands as the guards drop

use hive_core::ai::{is_decided, legal_commands, AiStats, SearchClock};
use hive_core::{Color, GameCommand, GameState, HiveError};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::rollout::{playout, score};
use crate::tree::{MctsTree, NodeId};
use crate::{MctsConfig, TreePolicy};

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Result of MCTS search
#[derive(Debug)]
pub struct SearchResult {
    /// The final tree after search
    pub tree: MctsTree,
    /// Completed iterations
    pub iterations: u32,
    /// Chosen command
    pub command: GameCommand,
}

impl SearchResult {
    /// Root commands sorted by visits, most visited first
    pub fn moves_by_visits(&self) -> Vec<(GameCommand, u32)> {
        let mut moves: Vec<_> = self
            .tree
            .move_statistics()
            .into_iter()
            .map(|(command, visits, _)| (command, visits))
            .collect();
        moves.sort_by(|a, b| b.1.cmp(&a.1));
        moves
    }
}

// ============================================================================
// SEARCH LOOP
// ============================================================================

/// Run MCTS for the active player of `state` until the time budget or the
/// iteration cap runs out. At least one iteration runs unless the position
/// is already decided. `state` is restored on return.
pub fn run_search<R: Rng>(
    state: &mut GameState,
    config: &MctsConfig,
    rng: &mut R,
    stats: &mut AiStats,
) -> Result<SearchResult, HiveError> {
    let mut search = Search {
        config,
        rng,
        stats,
        tree: MctsTree::new(),
        root: state.active_color(),
    };

    let mut clock = SearchClock::start(config.time_limit);
    let mut iterations = 0;
    if !is_decided(state) {
        loop {
            if config.iterations.map_or(false, |cap| iterations >= cap) {
                break;
            }
            if iterations > 0 && clock.expired() {
                break;
            }
            search.iterate(state, NodeId::ROOT)?;
            iterations += 1;
        }
    }

    let command = search
        .tree
        .best_root_commands()
        .choose(&mut *search.rng)
        .copied()
        .unwrap_or(GameCommand::Pass);

    Ok(SearchResult { tree: search.tree, iterations, command })
}

struct Search<'a, R> {
    config: &'a MctsConfig,
    rng: &'a mut R,
    stats: &'a mut AiStats,
    tree: MctsTree,
    root: Color,
}

impl<R: Rng> Search<'_, R> {
    /// One iteration below `id`, with `state` positioned at `id`. Returns the
    /// playout result after adding it to `id` and the nodes below.
    fn iterate(&mut self, state: &mut GameState, id: NodeId) -> Result<f64, HiveError> {
        if self.tree.get(id).terminal {
            let result = score(state, self.root);
            self.tree.update(id, result);
            return Ok(result);
        }

        if !self.tree.get(id).is_fully_expanded() {
            if let Some(command) = self.untried_command(state, id) {
                let result = self.expand(state, id, command)?;
                self.tree.update(id, result);
                return Ok(result);
            }
        }

        let result = match self.select(state, id) {
            Some(child) => {
                let command = self
                    .tree
                    .get(child)
                    .command
                    .ok_or_else(|| HiveError::Invariant("tree node without a command".into()))?;
                let mut child_state = state.scoped(command)?;
                self.iterate(&mut child_state, child)?
            }
            // Every child ends the game: the chooser takes the best of them
            None => self.settled_value(state, id),
        };
        self.tree.update(id, result);
        Ok(result)
    }

    /// Add the child for `command` and run its first playout
    fn expand(&mut self, state: &mut GameState, id: NodeId, command: GameCommand) -> Result<f64, HiveError> {
        let mut child_state = state.scoped(command)?;
        let terminal = is_decided(&child_state);
        let child = self.tree.add_child(id, command, terminal);
        let result = if terminal {
            score(&child_state, self.root)
        } else {
            self.stats.positions_evaluated += 1;
            playout(&mut child_state, self.config.max_depth, self.root, &mut *self.rng)?
        };
        self.tree.update(child, result);
        Ok(result)
    }

    /// A legal command at `id` without a child yet, probing forward from a
    /// random start
    fn untried_command(&mut self, state: &GameState, id: NodeId) -> Option<GameCommand> {
        let commands = legal_commands(state);
        let node = self.tree.get_mut(id);
        if node.max_children.is_none() {
            node.max_children = Some(commands.len());
            self.stats.node_branched(commands.len());
        }

        let node = self.tree.get(id);
        let start = self.rng.gen_range(0..commands.len());
        (0..commands.len())
            .map(|i| commands[(start + i) % commands.len()])
            .find(|command| !node.has_child(*command))
    }

    fn select(&mut self, state: &GameState, id: NodeId) -> Option<NodeId> {
        match self.config.policy {
            TreePolicy::Uct => {
                let sign = self.sign(state);
                self.tree.best_uct_child(id, self.config.exploration, sign)
            }
            TreePolicy::Random => self.tree.open_children(id).choose(&mut *self.rng).copied(),
        }
    }

    /// Best child mean for whoever chooses at `id`, root player's view
    fn settled_value(&self, state: &GameState, id: NodeId) -> f64 {
        let sign = self.sign(state);
        self.tree
            .get(id)
            .children
            .iter()
            .map(|(_, child)| sign * self.tree.get(*child).mean())
            .fold(f64::NEG_INFINITY, f64::max)
            .max(-1.0)
            * sign
    }

    fn sign(&self, state: &GameState) -> f64 {
        if state.active_color() == self.root {
            1.0
        } else {
            -1.0
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
