//! HTTP client port: one GET against the controlled device.

use std::future::Future;
use std::sync::Arc;

use winctrl_domain::error::HttpRequestFailed;
use winctrl_domain::relay::DeviceResponse;

/// Issues a single GET and returns the status code and body text.
///
/// Any transport-level failure surfaces as [`HttpRequestFailed`]. A non-2xx
/// status is *not* a failure.
pub trait HttpClient {
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<DeviceResponse, HttpRequestFailed>> + Send;
}

impl<T: HttpClient + Send + Sync> HttpClient for Arc<T> {
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<DeviceResponse, HttpRequestFailed>> + Send {
        (**self).get(url)
    }
}
