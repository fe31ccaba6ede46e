//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },

    /// The input document could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// The input document has no recognizable shape.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// A graph could not be exported.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Errors raised while reading the source log. Fatal to the run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// Input path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Document classification errors. Fatal to the run.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The document is an empty list.
    #[error("Document is empty")]
    EmptyDocument,

    /// Neither log format matches.
    #[error("Unrecognized log shape: {message}")]
    UnrecognizedShape {
        /// What was found instead.
        message: String,
    },
}

/// Rendering errors. Scoped to a single tree.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing an artifact failed.
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The layout binary could not be started.
    #[error("Renderer '{binary}' unavailable: {message}")]
    RendererUnavailable {
        /// Binary that was invoked.
        binary: String,
        /// Spawn error text.
        message: String,
    },

    /// The layout binary exited unsuccessfully.
    #[error("Renderer exited with status {status}: {stderr}")]
    RendererFailed {
        /// Exit code, or -1 when killed by a signal.
        status: i32,
        /// Captured standard error.
        stderr: String,
    },
}

/// Reason a logical tree produced nothing to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No root could be discovered from `fathers` or the exploration order.
    NoRoot,
    /// The layered record has no steps.
    NoSteps,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoRoot => write!(f, "no root node found"),
            SkipReason::NoSteps => write!(f, "no steps recorded"),
        }
    }
}

/// A layered step whose `ys` and `new_ys` disagree in length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepShapeWarning {
    /// Zero-based step index.
    pub step: usize,
    /// Number of parents listed in `ys`.
    pub ys_len: usize,
    /// Number of entries listed in `new_ys`.
    pub new_ys_len: usize,
    /// Whether `new_ys` held one child list per parent.
    pub grouped: bool,
}

impl std::fmt::Display for StepShapeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ys_len == self.new_ys_len && !self.grouped {
            write!(
                f,
                "step {} new_ys is not grouped per parent (ys={}, new_ys={}); skipping its edges",
                self.step, self.ys_len, self.new_ys_len
            )
        } else {
            write!(
                f,
                "step {} length mismatch (ys={}, new_ys={}); skipping its edges",
                self.step, self.ys_len, self.new_ys_len
            )
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for exporter operations
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "bad threshold".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: bad threshold");
    }

    #[test]
    fn test_format_error_display() {
        assert_eq!(FormatError::EmptyDocument.to_string(), "Document is empty");

        let err = FormatError::UnrecognizedShape {
            message: "no fathers mapping".to_string(),
        };
        assert_eq!(err.to_string(), "Unrecognized log shape: no fathers mapping");
    }

    #[test]
    fn test_export_error_display() {
        let err = ExportError::RendererUnavailable {
            binary: "dot".to_string(),
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Renderer 'dot' unavailable: not found");

        let err = ExportError::RendererFailed {
            status: 1,
            stderr: "syntax error".to_string(),
        };
        assert_eq!(err.to_string(), "Renderer exited with status 1: syntax error");
    }

    #[test]
    fn test_load_error_includes_path() {
        let err = LoadError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
    }

    #[test]
    fn test_format_error_conversion_to_app_error() {
        let app_err: AppError = FormatError::EmptyDocument.into();
        assert!(matches!(app_err, AppError::Format(_)));
    }

    #[test]
    fn test_export_error_conversion_to_app_error() {
        let app_err: AppError = ExportError::RendererFailed {
            status: 2,
            stderr: String::new(),
        }
        .into();
        assert!(matches!(app_err, AppError::Export(_)));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NoRoot.to_string(), "no root node found");
        assert_eq!(SkipReason::NoSteps.to_string(), "no steps recorded");
    }

    #[test]
    fn test_step_shape_warning_display() {
        let warning = StepShapeWarning {
            step: 1,
            ys_len: 2,
            new_ys_len: 3,
            grouped: true,
        };
        assert_eq!(
            warning.to_string(),
            "step 1 length mismatch (ys=2, new_ys=3); skipping its edges"
        );
    }

    #[test]
    fn test_ungrouped_step_warning_display() {
        let warning = StepShapeWarning {
            step: 2,
            ys_len: 2,
            new_ys_len: 2,
            grouped: false,
        };
        assert_eq!(
            warning.to_string(),
            "step 2 new_ys is not grouped per parent (ys=2, new_ys=2); skipping its edges"
        );
    }
}
