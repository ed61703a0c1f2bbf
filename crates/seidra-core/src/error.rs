//! Domain error types.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level domain error type shared by the record stores and the media
/// pipeline.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-domain input, rejected before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record identifier is unknown to its repository.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (`character`, `scenario`, `prompt`, `render`).
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// Dispatch to a backend name that is not registered.
    #[error("{media_kind} backend '{name}' not found; available: [{}]", .available.join(", "))]
    BackendNotFound {
        /// `image` or `video`.
        media_kind: &'static str,
        /// The requested backend name.
        name: String,
        /// Registered backend names, sorted.
        available: Vec<String>,
    },

    /// The external generation command exited with a non-zero status.
    #[error("command failed with exit code {exit_code:?}: {command}")]
    Execution {
        /// The resolved invocation string.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        exit_code: Option<i32>,
        /// Captured standard error of the command.
        stderr: String,
    },

    /// The external command reported success but the expected file is absent.
    #[error("command produced no output at {}; command: {command}", .path.display())]
    OutputMissing {
        /// Where the output was expected.
        path: PathBuf,
        /// The resolved invocation string.
        command: String,
    },

    /// A generated artifact is larger than the configured ceiling.
    #[error("{media_kind} at {} is {size_bytes} bytes, above the {max_size_bytes} byte limit", .path.display())]
    SizeExceeded {
        /// `image` or `video`.
        media_kind: &'static str,
        /// The retained oversized artifact.
        path: PathBuf,
        /// Actual size on disk.
        size_bytes: u64,
        /// Configured ceiling.
        max_size_bytes: u64,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Builds a `NotFound` error for a record kind and identifier.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
