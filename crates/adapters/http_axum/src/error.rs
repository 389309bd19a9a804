//! Status server error types.

use std::io;

/// Errors raised while binding, serving or closing the status server.
#[derive(Debug, thiserror::Error)]
pub enum StatusServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("status server failed")]
    Serve(#[source] io::Error),

    /// Open connections did not drain in time; the server was aborted.
    #[error("status server did not drain within {0:?}")]
    DrainTimeout(std::time::Duration),

    /// The server task panicked or was aborted.
    #[error("status server task failed")]
    Task(#[source] tokio::task::JoinError),
}
