//! Graphviz DOT exporter.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::{escape_dot, node_label, with_extension_suffix, GraphExporter, LabelOptions};
use crate::config::RenderConfig;
use crate::error::{ExportError, ExportResult};
use crate::graph::{CanonicalGraph, Emphasis};

/// Writes `{stem}.dot` and, when enabled, runs Graphviz to produce
/// `{stem}.{format}`.
#[derive(Debug, Clone)]
pub struct DotExporter {
    config: RenderConfig,
}

impl DotExporter {
    /// Create an exporter from render configuration
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn label_options(&self) -> LabelOptions {
        LabelOptions {
            wrap_width: self.config.wrap_width,
            max_chars: self.config.max_label_chars,
        }
    }

    /// Render `graph` as DOT source.
    pub fn to_dot(&self, graph: &CanonicalGraph, name: &str) -> String {
        let options = self.label_options();
        let mut dot = String::new();

        dot.push_str(&format!("digraph \"{}\" {{\n", escape_dot(name)));
        dot.push_str(&format!("    rankdir={};\n", self.config.rankdir));
        dot.push_str(
            "    node [shape=box, style=filled, color=lightblue, fontname=\"Helvetica\"];\n",
        );
        dot.push('\n');

        for node in graph.nodes() {
            let label = escape_dot(&node_label(graph, node, &options));
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\", {}];\n",
                node.id,
                label,
                emphasis_style(node.emphasis)
            ));
        }

        dot.push('\n');

        for (parent, child) in graph.edges() {
            dot.push_str(&format!("    \"{}\" -> \"{}\";\n", parent, child));
        }

        dot.push_str("}\n");
        dot
    }

    fn render_image(&self, dot_path: &Path, image_path: &Path) -> ExportResult<()> {
        let binary = &self.config.dot_binary;
        let output = Command::new(binary)
            .arg(format!("-T{}", self.config.image_format))
            .arg(dot_path)
            .arg("-o")
            .arg(image_path)
            .output()
            .map_err(|e| ExportError::RendererUnavailable {
                binary: binary.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExportError::RendererFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl GraphExporter for DotExporter {
    fn export(&mut self, graph: CanonicalGraph, stem: &Path) -> ExportResult<PathBuf> {
        let name = stem
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "search_tree".to_string());
        let dot_path = with_extension_suffix(stem, "dot");

        fs::write(&dot_path, self.to_dot(&graph, &name)).map_err(|source| ExportError::Io {
            path: dot_path.clone(),
            source,
        })?;
        debug!(path = %dot_path.display(), nodes = graph.node_count(), "DOT source written");

        if !self.config.render_images {
            return Ok(dot_path);
        }

        let image_path = with_extension_suffix(stem, &self.config.image_format);
        self.render_image(&dot_path, &image_path)?;
        info!(path = %image_path.display(), "Image rendered");
        Ok(image_path)
    }
}

fn emphasis_style(emphasis: Emphasis) -> &'static str {
    match emphasis {
        Emphasis::Root => "fillcolor=lightgrey",
        Emphasis::HighReward => "fillcolor=lightgreen",
        Emphasis::Selected => "fillcolor=white, color=green, penwidth=2.0",
        Emphasis::None => "fillcolor=white",
    }
}
