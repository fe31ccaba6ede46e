//! Canonical graph model shared by both tree builders.
//!
//! A [`CanonicalGraph`] is the format-agnostic node/edge set handed to a
//! [`GraphExporter`](crate::render::GraphExporter). Node identity is
//! content-based: the same content string always maps to the same
//! [`NodeId`], no matter where it appears in the log.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the content digest.
const NODE_ID_HEX_LEN: usize = 16;

/// Stable identifier derived from a node's dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Derive the identifier for a dedup key.
    ///
    /// The id is the first 16 hex characters of the SHA-256 digest, so it is
    /// stable across runs and safe to use as a Graphviz identifier.
    pub fn from_key(key: &str) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(NODE_ID_HEX_LEN);
        Self(id)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual-significance tag on a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Plain node.
    #[default]
    None,
    /// Average reward above the configured threshold.
    HighReward,
    /// Selected to continue into the next layered step.
    Selected,
    /// The tree's root.
    Root,
}

impl Emphasis {
    fn precedence(self) -> u8 {
        match self {
            Emphasis::None => 0,
            Emphasis::HighReward => 1,
            Emphasis::Selected => 2,
            Emphasis::Root => 3,
        }
    }

    /// Combine two emphasis tags, keeping the one with higher precedence.
    ///
    /// ROOT outranks SELECTED, and both outrank HIGH_REWARD.
    pub fn combine(self, other: Emphasis) -> Emphasis {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }
}

/// Which log format a graph was reconstructed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    /// Father/child MCTS log with reward samples.
    Standard,
    /// Step-indexed layer expansion log.
    Layered,
}

impl TreeKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeKind::Standard => "standard",
            TreeKind::Layered => "layered",
        }
    }
}

impl std::fmt::Display for TreeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reconstructed search state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Content-derived identifier.
    pub id: NodeId,
    /// Raw state text this node represents.
    pub content: String,
    /// Number of reward samples observed.
    pub visit_count: usize,
    /// Mean of the reward samples, 0.0 when there are none.
    pub average_reward: f64,
    /// Visual emphasis.
    pub emphasis: Emphasis,
}

impl Node {
    fn new(id: NodeId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            visit_count: 0,
            average_reward: 0.0,
            emphasis: Emphasis::None,
        }
    }
}

/// Format-agnostic node/edge representation of one logical tree.
#[derive(Debug, Clone)]
pub struct CanonicalGraph {
    kind: TreeKind,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    edges: Vec<(NodeId, NodeId)>,
    root: Option<NodeId>,
}

impl CanonicalGraph {
    /// Create an empty graph.
    pub fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            root: None,
        }
    }

    /// Return the node for `content`, creating it if absent.
    ///
    /// `content` is used verbatim as the dedup key; callers canonicalize it
    /// first when their format requires it.
    pub fn ensure_node(&mut self, content: &str) -> NodeId {
        let id = NodeId::from_key(content);
        if !self.index.contains_key(&id) {
            self.index.insert(id.clone(), self.nodes.len());
            self.nodes.push(Node::new(id.clone(), content));
        }
        id
    }

    /// Add a `parent -> child` edge, creating either endpoint if needed.
    pub fn connect(&mut self, parent: &str, child: &str) -> (NodeId, NodeId) {
        let parent_id = self.ensure_node(parent);
        let child_id = self.ensure_node(child);
        self.edges.push((parent_id.clone(), child_id.clone()));
        (parent_id, child_id)
    }

    /// Designate `content` as the root, creating the node if needed.
    pub fn set_root(&mut self, content: &str) -> NodeId {
        let id = self.ensure_node(content);
        self.emphasize(&id, Emphasis::Root);
        self.root = Some(id.clone());
        id
    }

    /// Record reward samples for a node. Returns false if the node is unknown.
    pub fn record_rewards(&mut self, id: &NodeId, samples: &[f64]) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.visit_count = samples.len();
        node.average_reward = if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<f64>() / samples.len() as f64
        };
        true
    }

    /// Raise a node's emphasis, respecting precedence.
    pub fn emphasize(&mut self, id: &NodeId, emphasis: Emphasis) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.emphasis = node.emphasis.combine(emphasis);
                true
            }
            None => false,
        }
    }

    /// Source format of this graph.
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Nodes in first-seen order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in emission order. May contain duplicates.
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Root identifier, if one was designated.
    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Look up a node by its dedup key.
    pub fn node_by_content(&self, content: &str) -> Option<&Node> {
        self.node(&NodeId::from_key(content))
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        match self.index.get(id) {
            Some(&i) => self.nodes.get_mut(i),
            None => None,
        }
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_deterministic() {
        let a = NodeId::from_key("1 2 3 4");
        let b = NodeId::from_key("1 2 3 4");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), NODE_ID_HEX_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_node_id_differs_for_different_content() {
        assert_ne!(NodeId::from_key("a"), NodeId::from_key("b"));
        assert_ne!(NodeId::from_key("a"), NodeId::from_key(" a"));
    }

    #[test]
    fn test_emphasis_combine_precedence() {
        assert_eq!(Emphasis::None.combine(Emphasis::HighReward), Emphasis::HighReward);
        assert_eq!(Emphasis::HighReward.combine(Emphasis::Selected), Emphasis::Selected);
        assert_eq!(Emphasis::Root.combine(Emphasis::Selected), Emphasis::Root);
        assert_eq!(Emphasis::Root.combine(Emphasis::HighReward), Emphasis::Root);
        assert_eq!(Emphasis::Selected.combine(Emphasis::None), Emphasis::Selected);
    }

    #[test]
    fn test_ensure_node_dedups() {
        let mut graph = CanonicalGraph::new(TreeKind::Layered);
        let first = graph.ensure_node("state");
        let second = graph.ensure_node("state");
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_connect_creates_endpoints() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        let (p, c) = graph.connect("root", "child");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), &[(p.clone(), c.clone())]);
        assert!(graph.node(&p).is_some());
        assert!(graph.node(&c).is_some());
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        graph.connect("a", "b");
        graph.connect("a", "b");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_set_root_marks_emphasis() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        let root = graph.set_root("root");
        assert_eq!(graph.root(), Some(&root));
        assert_eq!(graph.node(&root).unwrap().emphasis, Emphasis::Root);

        graph.emphasize(&root, Emphasis::Selected);
        assert_eq!(graph.node(&root).unwrap().emphasis, Emphasis::Root);
    }

    #[test]
    fn test_record_rewards_average() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        let id = graph.ensure_node("n");
        assert!(graph.record_rewards(&id, &[80.0, 100.0]));
        let node = graph.node(&id).unwrap();
        assert_eq!(node.visit_count, 2);
        assert!((node.average_reward - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_rewards_empty_samples() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        let id = graph.ensure_node("n");
        graph.record_rewards(&id, &[]);
        let node = graph.node(&id).unwrap();
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.average_reward, 0.0);
    }

    #[test]
    fn test_record_rewards_unknown_node() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        assert!(!graph.record_rewards(&NodeId::from_key("missing"), &[1.0]));
        assert!(!graph.emphasize(&NodeId::from_key("missing"), Emphasis::Root));
    }

    #[test]
    fn test_node_by_content() {
        let mut graph = CanonicalGraph::new(TreeKind::Layered);
        graph.ensure_node("x");
        assert!(graph.node_by_content("x").is_some());
        assert!(graph.node_by_content("y").is_none());
        assert_eq!(graph.kind(), TreeKind::Layered);
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph = CanonicalGraph::new(TreeKind::Standard);
        assert!(graph.is_empty());
        assert!(graph.root().is_none());
        assert_eq!(graph.edge_count(), 0);
    }
}
