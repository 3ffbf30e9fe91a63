//! Crate-level error types for doclink.

use std::path::PathBuf;

/// Failures outside of reference resolution itself. Resolution problems are
/// never errors: they are collected as [`Problem`](crate::diagnostics::Problem)s.
#[allow(clippy::error_impl_error, reason = "single crate-wide error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An explicitly requested config file does not exist on disk.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A batch worker panicked while resolving a document.
    #[error("resolution worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker thread.
        worker: usize,
    },
}
