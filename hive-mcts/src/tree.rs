//! MCTS tree structure and node management
//!
//! Nodes live in an arena and refer to each other by index. A node does not
//! hold a game state: the search walks one shared [`GameState`] down the tree
//! by applying each node's command, and undoes them on the way back.
//!
//! Results are stored from the point of view of the player the search is
//! choosing a move for (the root player).
//!
//! [`GameState`]: hive_core::GameState

use hive_core::GameCommand;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the MCTS tree
#[derive(Clone, Debug, Default)]
pub struct GameNode {
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Command leading here from the parent (None for root)
    pub command: Option<GameCommand>,
    /// Expanded children, in expansion order
    pub children: Vec<(GameCommand, NodeId)>,
    /// Playouts run through this node
    pub visits: u32,
    /// Sum of playout results, root player's view
    pub total: f64,
    /// Number of legal commands here, known once the node is first expanded
    pub max_children: Option<usize>,
    /// A queen is surrounded or the turn limit is reached
    pub terminal: bool,
}

impl GameNode {
    /// Mean result, root player's view. Unvisited nodes are even.
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / self.visits as f64
        }
    }

    /// Every legal command has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.max_children == Some(self.children.len())
    }

    pub fn has_child(&self, command: GameCommand) -> bool {
        self.children.iter().any(|(c, _)| *c == command)
    }
}

// ============================================================================
// MCTS TREE
// ============================================================================

/// MCTS search tree with arena allocation
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<GameNode>,
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MctsTree {
    /// Tree holding only the root
    pub fn new() -> Self {
        Self { nodes: vec![GameNode::default()] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut GameNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a new child for `command` under `parent`
    pub fn add_child(&mut self, parent: NodeId, command: GameCommand, terminal: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GameNode {
            parent: Some(parent),
            command: Some(command),
            terminal,
            ..GameNode::default()
        });
        self.get_mut(parent).children.push((command, id));
        id
    }

    /// Add one playout result to a single node
    pub fn update(&mut self, id: NodeId, result: f64) {
        let node = self.get_mut(id);
        node.visits += 1;
        node.total += result;
    }

    /// Add a playout result to `leaf` and every ancestor
    pub fn backpropagate(&mut self, leaf: NodeId, result: f64) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            self.update(id, result);
            current = self.get(id).parent;
        }
    }

    // ========================================================================
    // Selection Helpers
    // ========================================================================

    /// Children a tree policy may descend into
    pub fn open_children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .children
            .iter()
            .map(|(_, child)| *child)
            .filter(|child| !self.get(*child).terminal)
            .collect()
    }

    /// Open child with the highest UCT score. `sign` is 1.0 when the root
    /// player chooses at `id` and -1.0 when the opponent does.
    pub fn best_uct_child(&self, id: NodeId, exploration: f64, sign: f64) -> Option<NodeId> {
        let parent_visits = self.get(id).visits.max(1);
        let mut best: Option<(NodeId, f64)> = None;
        for child in self.open_children(id) {
            let score = self.uct(child, parent_visits, exploration, sign);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }

    /// UCT = mean + C * sqrt(ln(parent visits) / visits)
    fn uct(&self, id: NodeId, parent_visits: u32, exploration: f64, sign: f64) -> f64 {
        let node = self.get(id);
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let exploitation = sign * node.mean();
        let exploration_term = exploration * ((parent_visits as f64).ln() / node.visits as f64).sqrt();
        exploitation + exploration_term
    }

    // ========================================================================
    // Best Move Selection
    // ========================================================================

    /// Root children sharing the highest mean
    pub fn best_root_commands(&self) -> Vec<GameCommand> {
        let root = self.get(self.root());
        let best = root
            .children
            .iter()
            .map(|(_, id)| self.get(*id).mean())
            .fold(f64::NEG_INFINITY, f64::max);
        root.children
            .iter()
            .filter(|(_, id)| self.get(*id).mean() == best)
            .map(|(command, _)| *command)
            .collect()
    }

    /// (command, visits, mean) for every root child
    pub fn move_statistics(&self) -> Vec<(GameCommand, u32, f64)> {
        self.get(self.root())
            .children
            .iter()
            .map(|(command, id)| {
                let node = self.get(*id);
                (*command, node.visits, node.mean())
            })
            .collect()
    }

    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).visits
    }
}

// ============================================================================
// TESTS
// ============================================================================
