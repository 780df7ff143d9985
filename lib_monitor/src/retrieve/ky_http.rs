//! # HTTP Retrieval Utilities
//!
//! A small asynchronous client wrapper around `reqwest`. It joins relative
//! paths onto a base URL, injects per-request headers and, when asked to,
//! retries transient failures with exponential backoff.

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use thiserror::Error;

/// Failures below the HTTP status line: bad URLs, connection errors,
/// undecodable bodies.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The base URL or the joined path is not a valid URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The response body could not be read or decoded.
    #[error("failed to read response body: {0}")]
    Body(#[from] reqwest::Error),
}

/// A decoded text response plus the HTTP metadata around it.
#[derive(Debug)]
pub struct ApiResponse {
    /// The response body, present when the status was 2xx.
    pub data: Option<String>,
    /// The body returned alongside a non-2xx status, if it could be read.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Whether the status code was in the 2xx range.
    pub success: bool,
    /// The headers returned by the server.
    pub headers: HeaderMap,
    /// The absolute URL that was requested.
    pub url: String,
}

/// A base-URL bound HTTP client.
///
/// Each upstream service gets its own `ApiClient`, so relative paths such as
/// `000001.js` resolve against the right host.
pub struct ApiClient {
    /// The underlying middleware-enabled client.
    inner: ClientWithMiddleware,
    /// The base URL to which all relative paths are joined.
    base_url: Url,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    /// * `base_url` - The absolute base URL, normally ending in `/`.
    /// * `max_retries` - How many times a transient failure is retried. `0`
    ///   installs no retry middleware at all.
    ///
    /// # Errors
    /// Returns `FetchError::Url` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, max_retries: u32) -> Result<Self, FetchError> {
        let url = Url::parse(base_url)?;

        let mut builder = ClientBuilder::new(reqwest::Client::new());
        if max_retries > 0 {
            let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            inner: builder.build(),
            base_url: url,
        })
    }

    /// The base URL this client resolves paths against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Performs a `GET` and returns the decoded body text.
    pub async fn get_text(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<ApiResponse, FetchError> {
        self.request(Method::GET, path, headers).await
    }

    /// Performs an HTTP request and captures the response as text.
    ///
    /// The body is decoded using the charset announced by the server, which
    /// matters for quote providers that still answer in GB18030.
    ///
    /// # Errors
    /// Returns a `FetchError` if URL joining, sending or body decoding fails.
    /// A non-2xx status is not an error here; it is reported through
    /// `ApiResponse::success`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<ApiResponse, FetchError> {
        let full_url = self.base_url.join(path)?;
        let url = full_url.to_string();
        let mut req = self.inner.request(method, full_url);

        if let Some(h) = headers {
            req = req.headers(h);
        }

        let response: reqwest::Response = req.send().await?;
        let status = response.status();
        let resp_headers = response.headers().clone();

        if status.is_success() {
            let text = response.text().await?;
            Ok(ApiResponse {
                data: Some(text),
                error_body: None,
                status: status.as_u16(),
                success: true,
                headers: resp_headers,
                url,
            })
        } else {
            let error_text = response.text().await.ok();
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
                headers: resp_headers,
                url,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_relative_base_url() {
        let result = ApiClient::new("fund.eastmoney.com/js/", 0);
        assert!(matches!(result, Err(FetchError::Url(_))));
    }

    #[test]
    fn test_paths_join_onto_base_url() {
        let client = ApiClient::new("http://fundgz.1234567.com.cn/js/", 2).unwrap();
        let joined = client.base_url().join("000001.js").unwrap();
        assert_eq!(joined.as_str(), "http://fundgz.1234567.com.cn/js/000001.js");
    }
}
