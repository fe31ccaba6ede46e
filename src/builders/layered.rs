//! Reconstruction of layered step-log trees.
//!
//! Step 0 expands the task input `x` into a flat list of children. Every
//! later step lists its parents in `ys` and one child group per parent in
//! `new_ys`. Contents are deduplicated by their trimmed text, so a state
//! reached from two parents becomes one node with two incoming edges.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{BuildOutcome, BuildReport};
use crate::error::{SkipReason, StepShapeWarning};
use crate::format::{Expansion, LayeredStep, LayeredTree};
use crate::graph::{CanonicalGraph, Emphasis, TreeKind};

/// Root content used when step 0 carries no `x`.
pub const DEFAULT_ROOT_CONTENT: &str = "root";

/// Build the canonical graph of a layered record.
///
/// A later step whose `new_ys` does not hold exactly one child list per
/// entry of `ys` is skipped with a [`StepShapeWarning`]; the remaining
/// steps are still processed.
pub fn build_layered(tree: &LayeredTree) -> BuildOutcome {
    let Some(first) = tree.steps.first() else {
        return BuildOutcome::Skipped(SkipReason::NoSteps);
    };

    let mut graph = CanonicalGraph::new(TreeKind::Layered);
    let root = first.x.as_deref().unwrap_or(DEFAULT_ROOT_CONTENT).trim();
    graph.set_root(root);

    let mut warnings = Vec::new();
    for (index, step) in tree.steps.iter().enumerate() {
        if index == 0 {
            expand_step(&mut graph, step, &[root], &[flatten(&step.new_ys)]);
            continue;
        }

        let parents: Vec<&str> = step.ys.iter().map(String::as_str).collect();
        let groups = match child_groups(&step.new_ys) {
            Some(groups) if groups.len() == parents.len() => groups,
            _ => {
                let warning = StepShapeWarning {
                    step: index,
                    ys_len: parents.len(),
                    new_ys_len: step.new_ys.len(),
                    grouped: step.new_ys.is_grouped(),
                };
                warn!(problem = %tree.problem, "{}", warning);
                warnings.push(warning);
                continue;
            }
        };

        expand_step(&mut graph, step, &parents, &groups);
    }

    debug!(
        problem = %tree.problem,
        steps = tree.steps.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped_steps = warnings.len(),
        "Layered tree built"
    );

    BuildOutcome::Built(BuildReport { graph, warnings })
}

fn expand_step(
    graph: &mut CanonicalGraph,
    step: &LayeredStep,
    parents: &[&str],
    groups: &[Vec<&str>],
) {
    let selected: HashSet<&str> = step.select_new_ys.iter().map(|s| s.trim()).collect();

    for (parent, children) in parents.iter().zip(groups) {
        let parent = parent.trim();
        for child in children {
            let child = child.trim();
            let (_, child_id) = graph.connect(parent, child);
            if selected.contains(child) {
                graph.emphasize(&child_id, Emphasis::Selected);
            }
        }
    }
}

/// Step 0 shape: all children hang off the single implicit root.
fn flatten(expansion: &Expansion) -> Vec<&str> {
    match expansion {
        Expansion::Flat(children) => children.iter().map(String::as_str).collect(),
        Expansion::Grouped(groups) => groups.iter().flatten().map(String::as_str).collect(),
    }
}

/// Later-step shape: one child group per parent. A flat list cannot be
/// paired with its parents.
fn child_groups(expansion: &Expansion) -> Option<Vec<Vec<&str>>> {
    match expansion {
        Expansion::Flat(_) => None,
        Expansion::Grouped(groups) => Some(
            groups
                .iter()
                .map(|group| group.iter().map(String::as_str).collect())
                .collect(),
        ),
    }
}
