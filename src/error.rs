//! Typed errors for nta-builder.
//!
//! Provides structured error types instead of anyhow for better
//! library ergonomics and pattern matching.

use crate::model::{EdgeId, LocationId, TemplateId};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for nta-builder operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Misuse of the build context or an incomplete model.
    #[error("Model error: {0}")]
    Build(#[from] BuildError),

    /// Error reading the statement trace.
    #[error("Statement error: {0}")]
    Statement(#[from] StatementError),

    /// Error assembling a configuration.
    #[error("Configuration error: {0}")]
    Builder(#[from] BuilderError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which end of an edge a location is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeEnd {
    Source,
    Target,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeEnd::Source => write!(f, "source"),
            EdgeEnd::Target => write!(f, "target"),
        }
    }
}

/// Error raised by the build context. The model is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Template handle does not belong to the current model.
    #[error("Unknown template handle {0}")]
    UnknownTemplate(TemplateId),

    /// Location handle does not belong to the current model.
    #[error("Unknown location handle {0}")]
    UnknownLocation(LocationId),

    /// Edge handle does not belong to the current model.
    #[error("Unknown edge handle {0}")]
    UnknownEdge(EdgeId),

    /// Location belongs to a different template than the one it is used in.
    #[error("Location {location} belongs to {owner}, not to {template}")]
    ForeignLocation {
        location: LocationId,
        owner: TemplateId,
        template: TemplateId,
    },

    /// Template has no initial location at serialization time.
    #[error("Template '{template}' has no initial location")]
    MissingInitialLocation { template: String },

    /// Edge is missing one of its endpoints at serialization time.
    #[error("Edge {edge} in template '{template}' has no {end} location")]
    DanglingEdge {
        template: String,
        edge: EdgeId,
        end: EdgeEnd,
    },
}

/// Error reading an NDJSON statement trace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatementError {
    /// Statement file not found.
    #[error("Statement file not found: {0}")]
    NotFound(PathBuf),

    /// Statement file holds no statements.
    #[error("Statement file is empty: {0}")]
    Empty(PathBuf),

    /// Invalid JSON in statement file.
    #[error("Invalid statement on line {line}: {reason}")]
    InvalidJson { line: usize, reason: String },

    /// IO error while reading statements.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error from a generated configuration builder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuilderError {
    /// A required field was not set.
    #[error("{builder}: missing required field '{field}'")]
    MissingRequiredField {
        builder: &'static str,
        field: &'static str,
    },
}

/// Result type alias using nta-builder's Error.
pub type NtaResult<T> = std::result::Result<T, Error>;
