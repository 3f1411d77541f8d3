//! Error types for the HTTP surfaces.

use std::net::SocketAddr;

/// Errors from setting up or running the HTTP command surface and client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Listener could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Server stopped with an I/O error.
    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),

    /// HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),
}

/// Result type alias for HTTP setup operations.
pub type Result<T> = std::result::Result<T, ApiError>;
