//! Command-line interface.
//!
//! Flags override values loaded by [`Config::from_env`]; anything not given
//! on the command line keeps its environment or default value.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Visualize search trees from logged search runs.
#[derive(Parser, Debug, Clone)]
#[command(name = "search-tree-viz", version, about)]
pub struct Cli {
    /// Path to the JSON log file
    pub json_file: PathBuf,

    /// Directory to save visualizations (default: visualizations)
    #[arg(long = "output_dir", visible_alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of trees to visualize (default: 5)
    #[arg(long = "max_trees", visible_alias = "max-trees")]
    pub max_trees: Option<usize>,

    /// Average reward above which non-root nodes are highlighted
    #[arg(
        long = "high_reward_threshold",
        visible_alias = "high-reward-threshold",
        value_parser = parse_threshold
    )]
    pub high_reward_threshold: Option<f64>,

    /// Graphviz output format: png, svg, pdf, ...
    #[arg(long)]
    pub format: Option<String>,

    /// Write DOT source only, without invoking Graphviz
    #[arg(long = "dot_only", visible_alias = "dot-only")]
    pub dot_only: bool,
}

impl Cli {
    /// Apply command-line overrides to `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output.output_dir = dir.clone();
        }
        if let Some(max_trees) = self.max_trees {
            config.output.max_trees = max_trees;
        }
        if let Some(threshold) = self.high_reward_threshold {
            config.render.high_reward_threshold = threshold;
        }
        if let Some(format) = &self.format {
            config.render.image_format = format.clone();
        }
        if self.dot_only {
            config.render.render_images = false;
        }
    }
}

/// Parse a finite reward threshold.
fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if threshold.is_finite() {
        Ok(threshold)
    } else {
        Err("threshold must be a finite number".to_string())
    }
}
