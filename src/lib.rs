//! # Search Tree Viz
//!
//! Reconstructs search trees from logged search runs and renders them with
//! Graphviz.
//!
//! ## Supported logs
//!
//! - **Standard**: father/child MCTS logs with `fathers`, optional `childs`
//!   and `to_explore_reward` reward samples, either as a list of
//!   `{index, data}` records or a lone object
//! - **Layered**: step-indexed expansion logs, a list of `{idx, steps}`
//!   records where each step maps parents (`ys`) to generated children
//!   (`new_ys`) and marks survivors in `select_new_ys`
//!
//! ## Architecture
//!
//! ```text
//! JSON log → classify → build_standard / build_layered → CanonicalGraph
//!                                                             ↓
//!                                                   GraphExporter (DOT → image)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use search_tree_viz::{Config, DotExporter, RunOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     std::fs::create_dir_all(&config.output.output_dir)?;
//!     let mut exporter = DotExporter::new(config.render.clone());
//!     let summary = search_tree_viz::pipeline::run_file(
//!         Path::new("results.json"),
//!         &RunOptions::from(&config),
//!         &mut exporter,
//!         &mut std::io::stdout(),
//!     )?;
//!     println!("{} trees rendered", summary.exported());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Tree reconstruction for both log formats.
pub mod builders;
/// Command-line interface definition.
pub mod cli;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Log format classification and typed log records.
pub mod format;
/// Canonical graph model.
pub mod graph;
/// Batch processing of a log document.
pub mod pipeline;
/// Label sanitization and graph exporters.
pub mod render;

pub use builders::{build_layered, build_standard, BuildOptions, BuildOutcome, BuildReport};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use format::{classify, ClassifiedLog};
pub use graph::{CanonicalGraph, Emphasis, Node, NodeId, TreeKind};
pub use pipeline::{RunOptions, RunSummary};
pub use render::{DotExporter, GraphExporter};
