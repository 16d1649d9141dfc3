//! Server error types.

use thiserror::Error;

/// Errors from server startup and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The accept loop failed after startup.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
