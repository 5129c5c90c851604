// src/client/api.rs
use crate::config::{ApiConfig, RewriteConfig};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Failure surfaced by [`ApiClient`].
///
/// Callers that only care about success/failure can treat the variants
/// uniformly; the message is the only observable difference.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (DNS, refused connection, ...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { message: String },

    /// The path could not be resolved against any configured origin.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

/// Per-request overrides. Defaults to no extra headers and no body.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

/// Error payload shape used by the backend for non-success answers.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Thin wrapper around `reqwest` that centralises base-URL resolution,
/// default headers, and failure normalisation.
pub struct ApiClient {
    base_url: String,
    rewrite: Option<RewriteConfig>,
    http: Client,
}

impl ApiClient {
    /// Build a client for the given API configuration.
    ///
    /// No timeout is installed; a request suspends until the transport
    /// resolves it one way or the other.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rewrite: config.rewrite,
            http,
        })
    }

    /// Issue one GET request and decode the JSON response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestOptions::default())
            .await
    }

    /// Issue one request. Exactly one network call; no retries.
    ///
    /// On a success status the body is decoded into `T` as-is. On any
    /// other status the body is read for a `detail` message, falling back
    /// to the HTTP status reason when the body is empty or not JSON.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.resolve_url(path)?;
        debug!(%method, %url, "issuing request");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Caller-supplied headers win on collision.
        for (name, value) in options.headers.iter() {
            headers.insert(name, value.clone());
        }

        let mut request = self.http.request(method, url).headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => status
                    .canonical_reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("request failed: {status}")),
            };
            return Err(ApiError::Server { message });
        }

        Ok(response.json::<T>().await?)
    }

    /// Resolve a path against the configured base URL, or through the dev
    /// rewrite rule when the base is empty.
    fn resolve_url(&self, path: &str) -> Result<Url, ApiError> {
        let candidate = if !self.base_url.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            match &self.rewrite {
                Some(rewrite) if path.starts_with(rewrite.prefix.as_str()) => {
                    format!("{}{}", rewrite.target.trim_end_matches('/'), path)
                }
                // A bare relative path fails Url::parse below.
                _ => path.to_string(),
            }
        };

        Ok(Url::parse(&candidate)?)
    }
}
