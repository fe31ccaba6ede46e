//! Rendering of canonical graphs.
//!
//! The core hands every finished [`CanonicalGraph`] to a [`GraphExporter`]
//! together with an output stem (a path without extension). The default
//! exporter is [`DotExporter`], which writes Graphviz source and optionally
//! lays it out into an image with the `dot` binary.

mod dot;
mod label;

pub use dot::*;
pub use label::*;

use std::path::{Path, PathBuf};

use crate::error::ExportResult;
use crate::graph::CanonicalGraph;

/// Consumer of finished graphs.
pub trait GraphExporter {
    /// Persist `graph` under `stem`, returning the path of the main artifact.
    fn export(&mut self, graph: CanonicalGraph, stem: &Path) -> ExportResult<PathBuf>;
}

/// Append `.{extension}` to a stem without touching dots already in it.
pub(crate) fn with_extension_suffix(stem: &Path, extension: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
