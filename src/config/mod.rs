//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Default high-reward emphasis threshold, on the reward scale of MCTS logs
pub const DEFAULT_HIGH_REWARD_THRESHOLD: f64 = 90.0;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Graph building and rendering configuration.
    pub render: RenderConfig,
    /// Batch output configuration.
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter used when RUST_LOG is unset.
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// JSON lines.
    Json,
}

/// Graph building and rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Average reward above which a non-root node is emphasized.
    pub high_reward_threshold: f64,
    /// Column width for label word wrapping.
    pub wrap_width: usize,
    /// Maximum label content length in characters before truncation.
    pub max_label_chars: usize,
    /// Graphviz output format passed as `-T<format>`.
    pub image_format: String,
    /// Graphviz layout binary.
    pub dot_binary: String,
    /// Graph direction: "TB", "LR", ...
    pub rankdir: String,
    /// When false only the `.dot` source is written.
    pub render_images: bool,
}

/// Batch output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory receiving rendered artifacts.
    pub output_dir: PathBuf,
    /// Maximum number of logical trees processed.
    pub max_trees: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let defaults = RenderConfig::default();
        let render = RenderConfig {
            high_reward_threshold: env::var("HIGH_REWARD_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.high_reward_threshold),
            wrap_width: env::var("LABEL_WRAP_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.wrap_width),
            max_label_chars: env::var("LABEL_MAX_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_label_chars),
            image_format: env::var("IMAGE_FORMAT").unwrap_or(defaults.image_format),
            dot_binary: env::var("DOT_BINARY").unwrap_or(defaults.dot_binary),
            rankdir: env::var("GRAPH_RANKDIR").unwrap_or(defaults.rankdir),
            render_images: env::var("RENDER_IMAGES")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.render_images),
        };

        if !render.high_reward_threshold.is_finite() {
            return Err(AppError::Config {
                message: "HIGH_REWARD_THRESHOLD must be a finite number".to_string(),
            });
        }
        if render.wrap_width == 0 {
            return Err(AppError::Config {
                message: "LABEL_WRAP_WIDTH must be greater than zero".to_string(),
            });
        }

        let output = OutputConfig {
            output_dir: PathBuf::from(
                env::var("OUTPUT_DIR").unwrap_or_else(|_| "visualizations".to_string()),
            ),
            max_trees: env::var("MAX_TREES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        Ok(Config {
            logging,
            render,
            output,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            high_reward_threshold: DEFAULT_HIGH_REWARD_THRESHOLD,
            wrap_width: 40,
            max_label_chars: 300,
            image_format: "png".to_string(),
            dot_binary: "dot".to_string(),
            rankdir: "TB".to_string(),
            render_images: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("visualizations"),
            max_trees: 5,
        }
    }
}
