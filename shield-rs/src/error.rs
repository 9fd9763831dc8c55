//! Error types for shield-rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for startup operations (config, resources, artifacts)
pub type Result<T> = std::result::Result<T, StartupError>;

/// Fatal errors raised while bootstrapping the classifier.
///
/// None of these are recoverable: the process refuses to serve requests
/// with a partially loaded classifier.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading a resource or artifact
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON or does not match the expected layout
    #[error("Malformed artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact was written by an incompatible exporter
    #[error("Unsupported format version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// Artifact parsed but its contents are inconsistent
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Vectorizer and model were not fitted together
    #[error("Vectorizer produces {vectorizer} features but model expects {model}")]
    DimensionMismatch { vectorizer: usize, model: usize },

    /// Linguistic resource missing or empty
    #[error("Linguistic resource unavailable: {0}")]
    Resource(String),
}

/// Per-request input errors. These are user-correctable and never reach the
/// normalizer or the artifacts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Message is empty or whitespace only
    #[error("Please enter a message to analyze!")]
    EmptyMessage,
}
