//! Reconstruction of father/child MCTS trees.

use tracing::{debug, warn};

use super::{BuildOptions, BuildOutcome, BuildReport};
use crate::error::SkipReason;
use crate::format::StandardTree;
use crate::graph::{CanonicalGraph, Emphasis, TreeKind};

/// Build the canonical graph of a standard record.
///
/// Node universe and root come from `fathers`; when that mapping is empty
/// the exploration order supplies both. Edges follow `childs` when the
/// record lists them, otherwise the reversed non-null `fathers` pairs.
pub fn build_standard(tree: &StandardTree, options: &BuildOptions) -> BuildOutcome {
    let mut graph = CanonicalGraph::new(TreeKind::Standard);

    let root = if tree.fathers.is_empty() {
        for content in &tree.to_explore {
            graph.ensure_node(content);
        }
        tree.to_explore.first().cloned()
    } else {
        let mut root: Option<&str> = None;
        for (child, parent) in &tree.fathers {
            graph.ensure_node(child);
            match parent {
                Some(parent) => {
                    graph.ensure_node(parent);
                }
                None => {
                    if let Some(displaced) = root {
                        warn!(
                            problem = %tree.problem,
                            displaced,
                            root = %child,
                            "Multiple root candidates in fathers; keeping the last"
                        );
                    }
                    root = Some(child.as_str());
                }
            }
        }
        root.map(str::to_string)
    };

    let Some(root) = root else {
        return BuildOutcome::Skipped(SkipReason::NoRoot);
    };
    let root_id = graph.set_root(&root);
    let universe = graph.node_count();

    match &tree.childs {
        Some(childs) => {
            for (parent, children) in childs {
                for child in children {
                    graph.connect(parent, child);
                }
            }
        }
        None => {
            for (child, parent) in &tree.fathers {
                if let Some(parent) = parent {
                    graph.connect(parent, child);
                }
            }
        }
    }

    if graph.node_count() > universe {
        debug!(
            problem = %tree.problem,
            extra = graph.node_count() - universe,
            "Edges reference contents outside the fathers mapping"
        );
    }

    let contents: Vec<_> = graph
        .nodes()
        .iter()
        .map(|node| (node.id.clone(), node.content.clone()))
        .collect();
    for (id, content) in contents {
        let samples = tree
            .rewards
            .get(&content)
            .map(Vec::as_slice)
            .unwrap_or_default();
        graph.record_rewards(&id, samples);

        let high = graph
            .node(&id)
            .is_some_and(|node| node.average_reward > options.high_reward_threshold);
        if high && id != root_id {
            graph.emphasize(&id, Emphasis::HighReward);
        }
    }

    debug!(
        problem = %tree.problem,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Standard tree built"
    );

    BuildOutcome::Built(BuildReport {
        graph,
        warnings: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{classify, ClassifiedLog};
    use crate::graph::NodeId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn standard(doc: serde_json::Value) -> StandardTree {
        match classify(&doc).unwrap() {
            ClassifiedLog::Standard(mut trees) => trees.remove(0),
            ClassifiedLog::Layered(_) => panic!("expected standard log"),
        }
    }

    fn build(doc: serde_json::Value) -> CanonicalGraph {
        build_standard(&standard(doc), &BuildOptions::default())
            .into_report()
            .expect("tree should build")
            .graph
    }

    fn edge(parent: &str, child: &str) -> (NodeId, NodeId) {
        (NodeId::from_key(parent), NodeId::from_key(child))
    }

    #[test]
    fn test_two_node_tree_with_high_reward_child() {
        let graph = build(json!({
            "fathers": {"root": null, "child1": "root"},
            "to_explore_reward": {"child1": [95, 95]}
        }));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), &[edge("root", "child1")]);
        assert_eq!(
            graph.node_by_content("root").unwrap().emphasis,
            Emphasis::Root
        );
        let child = graph.node_by_content("child1").unwrap();
        assert_eq!(child.emphasis, Emphasis::HighReward);
        assert_eq!(child.visit_count, 2);
        assert!((child.average_reward - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_at_threshold_is_not_high_reward() {
        let graph = build(json!({
            "fathers": {"root": null, "a": "root"},
            "to_explore_reward": {"a": [80, 100]}
        }));
        let a = graph.node_by_content("a").unwrap();
        assert!((a.average_reward - 90.0).abs() < f64::EPSILON);
        assert_eq!(a.emphasis, Emphasis::None);
    }

    #[test]
    fn test_root_wins_over_high_reward() {
        let graph = build(json!({
            "fathers": {"root": null},
            "to_explore_reward": {"root": [100]}
        }));
        let root = graph.node_by_content("root").unwrap();
        assert_eq!(root.emphasis, Emphasis::Root);
        assert_eq!(root.visit_count, 1);
    }

    #[test]
    fn test_custom_threshold() {
        let tree = standard(json!({
            "fathers": {"root": null, "a": "root"},
            "to_explore_reward": {"a": [0.8]}
        }));
        let options = BuildOptions {
            high_reward_threshold: 0.5,
        };
        let graph = build_standard(&tree, &options).into_report().unwrap().graph;
        assert_eq!(
            graph.node_by_content("a").unwrap().emphasis,
            Emphasis::HighReward
        );
    }

    #[test]
    fn test_childs_define_edges() {
        let graph = build(json!({
            "fathers": {"r": null, "a": "r", "b": "r", "c": "a"},
            "childs": {"r": ["b", "a"], "a": ["c"]}
        }));
        assert_eq!(
            graph.edges(),
            &[edge("r", "b"), edge("r", "a"), edge("a", "c")]
        );
    }

    #[test]
    fn test_edges_reverse_fathers_without_childs() {
        let graph = build(json!({
            "fathers": {"r": null, "a": "r", "b": "a"}
        }));
        assert_eq!(graph.edges(), &[edge("r", "a"), edge("a", "b")]);
    }

    #[test]
    fn test_parent_only_values_join_universe() {
        let graph = build(json!({
            "fathers": {"r": null, "b": "a"}
        }));
        assert_eq!(graph.node_count(), 3);
        assert!(graph.node_by_content("a").is_some());
    }

    #[test]
    fn test_single_root_emphasis() {
        let graph = build(json!({
            "fathers": {"r": null, "a": "r", "b": "r"},
            "to_explore_reward": {"a": [99], "b": [1]}
        }));
        let roots: Vec<_> = graph
            .nodes()
            .iter()
            .filter(|n| n.emphasis == Emphasis::Root)
            .collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].content, "r");
        assert_eq!(graph.root(), Some(&NodeId::from_key("r")));
    }

    #[test]
    fn test_to_explore_fallback() {
        let graph = build(json!({
            "fathers": {},
            "to_explore": ["start", "next"]
        }));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.root(), Some(&NodeId::from_key("start")));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_empty_universe_is_skipped() {
        let tree = standard(json!({"fathers": {}}));
        let outcome = build_standard(&tree, &BuildOptions::default());
        assert!(matches!(outcome, BuildOutcome::Skipped(SkipReason::NoRoot)));
    }

    #[test]
    fn test_no_null_father_is_skipped() {
        let tree = standard(json!({"fathers": {"a": "b", "b": "a"}}));
        let outcome = build_standard(&tree, &BuildOptions::default());
        assert!(matches!(outcome, BuildOutcome::Skipped(SkipReason::NoRoot)));
    }

    #[test]
    fn test_last_null_father_is_root() {
        let graph = build(json!({"fathers": {"r1": null, "a": "r2", "r2": null}}));
        assert_eq!(graph.root(), Some(&NodeId::from_key("r2")));
        assert_eq!(
            graph.node_by_content("r2").unwrap().emphasis,
            Emphasis::Root
        );
        assert_eq!(
            graph.node_by_content("r1").unwrap().emphasis,
            Emphasis::None
        );
    }

    #[test]
    fn test_unvisited_node_has_zero_stats() {
        let graph = build(json!({"fathers": {"r": null, "a": "r"}}));
        let a = graph.node_by_content("a").unwrap();
        assert_eq!(a.visit_count, 0);
        assert_eq!(a.average_reward, 0.0);
    }
}
