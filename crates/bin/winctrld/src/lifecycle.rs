//! Process shutdown: waiting for a termination signal and unloading.

use winctrl_adapter_http_axum::RunningStatusServer;

/// Release everything the adapter holds, then signal completion.
///
/// A status server that fails to close, or does not drain within its close
/// grace, is logged; `on_complete` runs regardless.
pub async fn unload(status_server: Option<RunningStatusServer>, on_complete: impl FnOnce()) {
    if let Some(server) = status_server {
        if let Err(err) = server.close().await {
            tracing::error!(error = %err, "error during unloading");
        }
    }
    on_complete();
}

/// Resolve on Ctrl+C, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use tokio::io::AsyncWriteExt;

    use winctrl_adapter_http_axum::{StatusServer, StatusState};
    use winctrl_domain::relay::DeviceEndpoint;

    #[tokio::test]
    async fn should_complete_when_no_server_was_started() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);

        unload(None, move || flag.store(true, Ordering::SeqCst)).await;

        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn should_close_server_before_completing() {
        let state = StatusState::new(Instant::now(), &DeviceEndpoint::default());
        let server = StatusServer::bind("127.0.0.1:0", state)
            .await
            .unwrap()
            .serve();
        let addr = server.local_addr();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);

        unload(Some(server), move || flag.store(true, Ordering::SeqCst)).await;

        assert!(done.load(Ordering::SeqCst));
        assert!(tokio::net::TcpListener::bind(addr).await.is_ok());
    }

    #[tokio::test]
    async fn should_complete_when_a_connection_never_finishes_its_request() {
        let state = StatusState::new(Instant::now(), &DeviceEndpoint::default());
        let server = StatusServer::bind("127.0.0.1:0", state)
            .await
            .unwrap()
            .serve()
            .with_close_grace(Duration::from_millis(200));
        let mut stalled = tokio::net::TcpStream::connect(server.local_addr())
            .await
            .unwrap();
        stalled
            .write_all(b"GET /status HTTP/1.1\r\nHost: x\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);

        tokio::time::timeout(
            Duration::from_secs(5),
            unload(Some(server), move || flag.store(true, Ordering::SeqCst)),
        )
        .await
        .unwrap();

        assert!(done.load(Ordering::SeqCst));
        drop(stalled);
    }
}
