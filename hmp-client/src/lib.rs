//! Hire My Printer HTTP Client
//!
//! A thin, authenticated HTTP client for the Hire My Printer order API.
//!
//! Only connection-level failures are treated as errors. Responses are returned
//! to the caller whatever their status code, so the caller decides what a 4xx
//! or 5xx means for it.
//!
//! # Example
//!
//! ```no_run
//! use hmp_client::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> hmp_client::Result<()> {
//!     let client = ApiClient::new("http://localhost:3000", "my-api-key")?;
//!
//!     let response = client.get("orders/?status=pending").await?;
//!     println!("API answered with {}", response.status());
//!     Ok(())
//! }
//! ```

mod download;
pub mod error;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use reqwest::{Method, Response, StatusCode};

use reqwest::Client;
use serde::Serialize;
use std::fmt;
use tracing::debug;
use url::Url;

/// HTTP client for the order API
///
/// Every request carries an `Authorization: Bearer <api key>` header. No
/// request timeout is configured.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL of the order API (e.g., "http://localhost:3000")
    base_url: String,
    /// Key sent as the bearer token
    api_key: String,
    /// HTTP client instance
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the order API (e.g., "http://localhost:3000")
    /// * `api_key` - The key used as bearer token on every request
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is not an absolute URL.
    ///
    /// # Example
    /// ```
    /// use hmp_client::ApiClient;
    ///
    /// let client = ApiClient::new("http://localhost:3000/", "secret").unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_client(base_url, api_key, Client::new())
    }

    /// Create a new API client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Get the base URL of the order API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send an authenticated request to the order API
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path relative to the base URL, query string included
    /// * `payload` - Optional body, serialized as JSON
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] if the request could not be sent.
    /// HTTP error statuses are not errors.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, &url).bearer_auth(&self.api_key);
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        debug!("{} answered {}", url, response.status());

        Ok(response)
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request::<()>(Method::GET, path, None).await
    }

    /// Send a POST request with a JSON body
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Response> {
        self.request(Method::POST, path, Some(payload)).await
    }

    /// Send a PATCH request with a JSON body
    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Response> {
        self.request(Method::PATCH, path, Some(payload)).await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
