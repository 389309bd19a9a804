//! Listener lifecycle of the status server.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::StatusServerError;
use crate::router;
use crate::state::StatusState;

/// How long `close` waits for open connections to drain.
pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(5);

/// A bound, not yet serving, status server.
pub struct StatusServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: StatusState,
}

impl StatusServer {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`StatusServerError::Bind`] if the address is unavailable.
    pub async fn bind(addr: &str, state: StatusState) -> Result<Self, StatusServerError> {
        let bind_err = |source| StatusServerError::Bind {
            addr: addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start serving in a background task.
    #[must_use]
    pub fn serve(self) -> RunningStatusServer {
        let Self {
            listener,
            local_addr,
            state,
        } = self;
        let (shutdown, signal) = oneshot::channel::<()>();
        let app = router::build(state);

        tracing::info!(addr = %local_addr, "HTTP server listening");
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender means the handle is gone: stop as well.
                    let _ = signal.await;
                })
                .await
        });

        RunningStatusServer {
            local_addr,
            shutdown,
            task,
            close_grace: DEFAULT_CLOSE_GRACE,
        }
    }
}

/// Handle to a serving status server.
pub struct RunningStatusServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
    close_grace: Duration,
}

impl RunningStatusServer {
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Bound the connection drain performed by [`close`](Self::close).
    #[must_use]
    pub fn with_close_grace(mut self, grace: Duration) -> Self {
        self.close_grace = grace;
        self
    }

    /// Stop accepting connections, drain in-flight requests and release the
    /// listening socket.
    ///
    /// When connections are still open after the close grace, the server
    /// task is aborted and the socket released anyway. A server that already
    /// stopped on its own is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StatusServerError::DrainTimeout`] when the grace ran out,
    /// the I/O error the server stopped with, or
    /// [`StatusServerError::Task`] if its task panicked.
    pub async fn close(mut self) -> Result<(), StatusServerError> {
        // The receiver is gone only when the server already finished.
        let _ = self.shutdown.send(());
        let Ok(joined) = tokio::time::timeout(self.close_grace, &mut self.task).await else {
            self.task.abort();
            // Wait for the cancelled task so the listener is dropped.
            let _ = (&mut self.task).await;
            tracing::warn!(addr = %self.local_addr, "HTTP server aborted with open connections");
            return Err(StatusServerError::DrainTimeout(self.close_grace));
        };
        match joined {
            Ok(Ok(())) => {
                tracing::info!(addr = %self.local_addr, "HTTP server closed");
                Ok(())
            }
            Ok(Err(err)) => Err(StatusServerError::Serve(err)),
            Err(err) => Err(StatusServerError::Task(err)),
        }
    }
}
