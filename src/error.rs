//! Error types for the pipeline.
//!
//! Terminal failures (`LoadError`, `ManifestError`, `ModuleNotFound`) abort
//! the whole invocation and surface as a structured `SchemaError`, never a
//! partial document. Unresolved exports and unparseable type text are not
//! errors: they degrade locally (skipped binding, opaque fragment).

use thiserror::Error;

/// File or network acquisition failed; the underlying message is passed
/// through verbatim.
#[derive(Debug, Clone, Error)]
#[error("failed to load {path}: {message}")]
pub struct LoadError {
    pub path: String,
    pub message: String,
}

impl LoadError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    #[error("manifest {path} has no \"main\" field")]
    MissingMain { path: String },
    #[error("invalid manifest {path}: at JSON path {json_path} → {message}")]
    Invalid {
        path: String,
        json_path: String,
        message: String,
    },
}

/// Terminal failure of one `compute_schema` invocation.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("module not found at {path}: {message}")]
    ModuleNotFound { path: String, message: String },
}
