//! Error types for amigurumi.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::pattern::OperationKind;

/// Result type alias using [`PatternError`].
pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur while compiling patterns, configuring the solver,
/// or reading and writing files.
#[derive(Error, Debug)]
pub enum PatternError {
    /// An operation needed more live stitches than the outline holds.
    #[error("not enough points to apply {op}: needs {required}, {available} available")]
    InsufficientStitches {
        /// The operation that failed.
        op: OperationKind,
        /// Stitches the operation consumes.
        required: usize,
        /// Stitches left in the outline.
        available: usize,
    },

    /// A node id outside the graph.
    #[error("node {node} does not exist (graph has {len} nodes)")]
    InvalidReference {
        /// The offending id.
        node: usize,
        /// Number of nodes in the graph.
        len: usize,
    },

    /// An operation mnemonic that does not name any stitch.
    #[error("operation {0} is not a valid operation")]
    UnknownOperation(String),

    /// Failure while compiling a single operation, with its position.
    #[error("round {round}, operation {operation} failed: {source}")]
    Compile {
        /// Round index within the pattern.
        round: usize,
        /// Operation index within the round.
        operation: usize,
        /// The underlying failure.
        #[source]
        source: Box<PatternError>,
    },

    /// Failure while executing a document command.
    #[error("command {index} failed: {source}")]
    Command {
        /// Command index within the document.
        index: usize,
        /// The underlying failure.
        #[source]
        source: Box<PatternError>,
    },

    /// A required field was absent from a document or anchor entry.
    #[error("{context} is missing required field \"{field}\"")]
    MissingField {
        /// What was being read.
        context: &'static str,
        /// The absent field.
        field: &'static str,
    },

    /// An anchor that cannot be honoured.
    #[error("invalid anchor for node {node}: {reason}")]
    InvalidAnchor {
        /// The anchored node.
        node: usize,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A document command referred to a part that was never defined.
    #[error("pattern {id} does not exist")]
    UnknownPart {
        /// The missing part id.
        id: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing a mesh to file.
    #[error("failed to export mesh to {path}: {message}")]
    Export {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl PatternError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        PatternError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Wrap this error with the round and operation it came from.
    pub fn at(self, round: usize, operation: usize) -> Self {
        PatternError::Compile {
            round,
            operation,
            source: Box::new(self),
        }
    }

    /// Wrap this error with the index of the document command it came from.
    pub fn in_command(self, index: usize) -> Self {
        PatternError::Command {
            index,
            source: Box::new(self),
        }
    }
}
