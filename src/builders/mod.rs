//! Tree reconstruction from classified logs.
//!
//! Each builder is a pure function from one typed log record to a
//! [`BuildOutcome`]:
//! - [`build_standard`]: father/child MCTS records with reward samples
//! - [`build_layered`]: step-indexed layer expansion records
//!
//! Neither builder performs I/O. Conditions that make a tree unrenderable
//! are returned as [`BuildOutcome::Skipped`], and recoverable oddities are
//! collected as warnings in the [`BuildReport`].

mod layered;
mod standard;

pub use layered::*;
pub use standard::*;

use crate::config::{RenderConfig, DEFAULT_HIGH_REWARD_THRESHOLD};
use crate::error::{SkipReason, StepShapeWarning};
use crate::graph::CanonicalGraph;

/// Options controlling graph annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Average reward above which a non-root node gets HIGH_REWARD.
    pub high_reward_threshold: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            high_reward_threshold: DEFAULT_HIGH_REWARD_THRESHOLD,
        }
    }
}

impl From<&RenderConfig> for BuildOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            high_reward_threshold: config.high_reward_threshold,
        }
    }
}

/// A successfully reconstructed tree.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Reconstructed graph.
    pub graph: CanonicalGraph,
    /// Steps whose edges were skipped.
    pub warnings: Vec<StepShapeWarning>,
}

/// Result of reconstructing one logical tree.
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// A graph ready for export.
    Built(BuildReport),
    /// Nothing to render.
    Skipped(SkipReason),
}

impl BuildOutcome {
    /// The built graph, if any.
    pub fn graph(&self) -> Option<&CanonicalGraph> {
        match self {
            BuildOutcome::Built(report) => Some(&report.graph),
            BuildOutcome::Skipped(_) => None,
        }
    }

    /// Consume the outcome, returning the report if the tree was built.
    pub fn into_report(self) -> Option<BuildReport> {
        match self {
            BuildOutcome::Built(report) => Some(report),
            BuildOutcome::Skipped(_) => None,
        }
    }
}
