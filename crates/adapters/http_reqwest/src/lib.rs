//! # winctrl-adapter-http-reqwest
//!
//! Device HTTP client built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `HttpClient` port from `winctrl-app`
//! - Issue exactly one GET per call, without headers, body or retries
//! - Map every transport failure to `HttpRequestFailed`
//!
//! ## Dependency rule
//! Depends on `winctrl-app` (for the port trait) and `winctrl-domain`.

use std::time::Duration;

use reqwest::redirect::Policy;

use winctrl_app::ports::HttpClient;
use winctrl_domain::error::HttpRequestFailed;
use winctrl_domain::relay::DeviceResponse;

/// Timeout applied to a device request when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Redirects followed before the request fails.
pub const MAX_REDIRECTS: usize = 10;

/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpRequestFailed`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, HttpRequestFailed> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|err| HttpRequestFailed::new(err.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<DeviceResponse, HttpRequestFailed> {
        tracing::debug!(url, "sending device request");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| HttpRequestFailed::new(err.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|err| HttpRequestFailed::new(err.to_string()))?;

        Ok(DeviceResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    /// Serve `app` on an ephemeral loopback port and return its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> ReqwestHttpClient {
        ReqwestHttpClient::new(DEFAULT_REQUEST_TIMEOUT).unwrap()
    }

    #[tokio::test]
    async fn should_return_status_and_body() {
        let base = serve(Router::new().route("/reboot", get(|| async { "rebooting" }))).await;

        let resp = client().get(&format!("{base}/reboot")).await.unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "rebooting");
    }

    #[tokio::test]
    async fn should_return_non_success_status_without_failing() {
        let base = serve(Router::new()).await;

        let resp = client().get(&format!("{base}/unknown")).await.unwrap();

        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn should_return_empty_body() {
        let base = serve(Router::new().route(
            "/quiet",
            get(|| async { StatusCode::NO_CONTENT }),
        ))
        .await;

        let resp = client().get(&format!("{base}/quiet")).await.unwrap();

        assert_eq!(resp.status, 204);
        assert!(resp.body.is_empty());
    }

    #[tokio::test]
    async fn should_fail_when_connection_is_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client().get(&format!("http://{addr}/mute")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn should_fail_on_malformed_url() {
        let result = client().get("http://[not-a-host/mute").await;

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("HTTP error: "));
    }

    #[tokio::test]
    async fn should_fail_when_device_exceeds_timeout() {
        let base = serve(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        ))
        .await;
        let client = ReqwestHttpClient::new(Duration::from_millis(100)).unwrap();

        let result = client.get(&format!("{base}/slow")).await;

        assert!(result.is_err());
    }
}
