//! Search nodes and principal-variation storage.
//!
//! Uses arena-based allocation with index references (`NodeId`). A node is
//! a move with its backed-up value and a link to the best continuation, so
//! a principal variation is a chain of links starting at a root child.

use serde::{Deserialize, Serialize};

use crate::moves::MoveRecord;

/// Index into the `Variation` node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A searched move.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchNode {
    /// The move this node represents.
    pub mv: MoveRecord,

    /// Value for the player who made the move.
    pub evaluation: f64,

    /// Value came from a static evaluation at the depth limit rather than
    /// a decided game.
    pub depth_limited: bool,

    /// Best reply (NONE at leaves).
    pub continuation: NodeId,
}

/// Arena of search nodes for one search.
#[derive(Clone, Debug, Default)]
pub struct Variation {
    nodes: Vec<SearchNode>,
}

impl Variation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Moves along the continuation links starting at `id`.
    #[must_use]
    pub fn line(&self, mut id: NodeId) -> Vec<MoveRecord> {
        let mut line = Vec::new();
        while !id.is_none() {
            let node = self.get(id);
            line.push(node.mv.clone());
            id = node.continuation;
        }
        line
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn node(mv: &str, continuation: NodeId) -> SearchNode {
        SearchNode {
            mv: mv.parse().unwrap(),
            evaluation: 0.0,
            depth_limited: false,
            continuation,
        }
    }

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_line_follows_links() {
        let mut arena = Variation::new();
        let leaf = arena.alloc(node("P0 move #0 c3", NodeId::NONE));
        let mid = arena.alloc(node("P1 move #1 a1", leaf));
        let root = arena.alloc(node("P0 move #0 b2", mid));

        let line = arena.line(root);
        assert_eq!(line.len(), 3);
        assert_eq!(line[0].player, PlayerId::FIRST);
        assert_eq!(line[2].to_string(), "P0 move #0 c3");
        assert!(arena.line(NodeId::NONE).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut arena = Variation::new();
        arena.alloc(node("P0 pass", NodeId::NONE));
        assert_eq!(arena.len(), 1);
        arena.clear();
        assert!(arena.is_empty());
    }
}
