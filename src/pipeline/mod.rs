//! Batch processing of one log document.
//!
//! A document is loaded, classified once, and each of its logical trees is
//! built and exported strictly in sequence. Document-level failures abort
//! the run; per-tree conditions are recorded in the [`RunSummary`] and the
//! batch moves on.

use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::builders::{build_layered, build_standard, BuildOptions, BuildOutcome};
use crate::config::Config;
use crate::error::{AppResult, LoadError, SkipReason, StepShapeWarning};
use crate::format::{classify, ClassifiedLog};
use crate::graph::TreeKind;
use crate::render::GraphExporter;

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory receiving rendered artifacts. Must exist.
    pub output_dir: PathBuf,
    /// Maximum number of logical trees processed.
    pub max_trees: usize,
    /// Graph annotation options.
    pub build: BuildOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("visualizations"),
            max_trees: 5,
            build: BuildOptions::default(),
        }
    }
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output.output_dir.clone(),
            max_trees: config.output.max_trees,
            build: BuildOptions::from(&config.render),
        }
    }
}

/// What happened to one logical tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeStatus {
    /// Rendered; holds the artifact path.
    Exported(PathBuf),
    /// Nothing to render.
    Skipped(SkipReason),
    /// The exporter failed.
    Failed(String),
}

/// Per-tree record of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeOutcome {
    /// Problem index from the log.
    pub problem: String,
    /// Output stem (path without extension).
    pub stem: PathBuf,
    /// What happened to the tree.
    pub status: TreeStatus,
    /// Layered steps whose edges were skipped.
    pub warnings: Vec<StepShapeWarning>,
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Detected log format.
    pub kind: TreeKind,
    /// Trees in processing order.
    pub trees: Vec<TreeOutcome>,
}

impl RunSummary {
    /// Trees rendered successfully.
    pub fn exported(&self) -> usize {
        self.count(|s| matches!(s, TreeStatus::Exported(_)))
    }

    /// Trees with nothing to render.
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, TreeStatus::Skipped(_)))
    }

    /// Trees whose export failed.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TreeStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&TreeStatus) -> bool) -> usize {
        self.trees.iter().filter(|t| predicate(&t.status)).count()
    }
}

/// Read and parse a JSON log document.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path` and process it with [`run_document`].
pub fn run_file(
    path: &Path,
    options: &RunOptions,
    exporter: &mut dyn GraphExporter,
    progress: &mut dyn Write,
) -> AppResult<RunSummary> {
    let document = load_document(path)?;
    debug!(path = %path.display(), "Document loaded");
    run_document(&document, options, exporter, progress)
}

/// Classify `document`, then build and export up to `max_trees` trees.
///
/// Human-readable progress lines are written to `progress`.
pub fn run_document(
    document: &Value,
    options: &RunOptions,
    exporter: &mut dyn GraphExporter,
    progress: &mut dyn Write,
) -> AppResult<RunSummary> {
    let log = classify(document)?;
    let kind = log.kind();
    info!(format = %kind, trees = log.len(), max_trees = options.max_trees, "Log classified");
    report(progress, format_args!("Detected {} log format.", kind));

    let mut trees = Vec::new();
    match &log {
        ClassifiedLog::Standard(records) => {
            for tree in records.iter().take(options.max_trees) {
                report(progress, format_args!("Visualizing problem {}...", tree.problem));
                let stem = options.output_dir.join(format!(
                    "tree_{}_{}",
                    file_component(&tree.problem),
                    tree.name
                ));
                let outcome = build_standard(tree, &options.build);
                trees.push(finish_tree(&tree.problem, stem, outcome, exporter, progress));
            }
        }
        ClassifiedLog::Layered(records) => {
            for tree in records.iter().take(options.max_trees) {
                report(progress, format_args!("Visualizing problem {}...", tree.problem));
                let stem = options
                    .output_dir
                    .join(format!("layered_tree_{}", file_component(&tree.problem)));
                let outcome = build_layered(tree);
                trees.push(finish_tree(&tree.problem, stem, outcome, exporter, progress));
            }
        }
    }

    let summary = RunSummary { kind, trees };
    info!(
        exported = summary.exported(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "Run complete"
    );
    Ok(summary)
}

fn finish_tree(
    problem: &str,
    stem: PathBuf,
    outcome: BuildOutcome,
    exporter: &mut dyn GraphExporter,
    progress: &mut dyn Write,
) -> TreeOutcome {
    let report_data = match outcome {
        BuildOutcome::Built(report_data) => report_data,
        BuildOutcome::Skipped(reason) => {
            warn!(problem, reason = %reason, "Skipping tree");
            report(
                progress,
                format_args!("Skipping tree {}: {}", stem.display(), reason),
            );
            return TreeOutcome {
                problem: problem.to_string(),
                stem,
                status: TreeStatus::Skipped(reason),
                warnings: Vec::new(),
            };
        }
    };

    for warning in &report_data.warnings {
        report(progress, format_args!("Warning: {}", warning));
    }

    let status = match exporter.export(report_data.graph, &stem) {
        Ok(path) => {
            report(
                progress,
                format_args!("Generated visualization: {}", path.display()),
            );
            TreeStatus::Exported(path)
        }
        Err(e) => {
            error!(problem, error = %e, "Failed to export tree");
            report(
                progress,
                format_args!("Failed to render {}: {}", stem.display(), e),
            );
            TreeStatus::Failed(e.to_string())
        }
    };

    TreeOutcome {
        problem: problem.to_string(),
        stem,
        status,
        warnings: report_data.warnings,
    }
}

fn report(progress: &mut dyn Write, line: impl Display) {
    if let Err(e) = writeln!(progress, "{}", line) {
        debug!(error = %e, "Progress output unavailable");
    }
}

/// Make a problem index safe to embed in a file name.
fn file_component(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
