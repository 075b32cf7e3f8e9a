//! HTTP plumbing for the upstream prospecting API.
//!
//! All requests carry the API key in an `X-Api-Key` header. Non-2xx
//! responses are mapped to user-facing messages at this boundary; the
//! body's own `message`/`error` field wins over the canned status text
//! when the upstream provides one.

use crate::error::{ApiError, Result};
use prospect_core::ApiKey;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Client for the upstream prospecting API.
///
/// The credential is passed in at construction; there is no process-wide
/// mutable key.
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl ApiClient {
    /// Create a new client against the given base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(30))
    }

    /// Create a new client with a custom request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self> {
        Self::with_options(
            base_url,
            api_key,
            timeout,
            concat!("Prospect/", env!("CARGO_PKG_VERSION")),
        )
    }

    /// Create a new client with a custom timeout and `User-Agent`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body to `path` and return the parsed response.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self
            .http
            .post(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
            .json(body);
        self.execute(request).await
    }

    /// POST a JSON body to `path` with query-string parameters.
    pub async fn post_json_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value> {
        let request = self
            .http
            .post(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
            .query(query)
            .json(body);
        self.execute(request).await
    }

    /// GET `path` and return the parsed response.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let request = self
            .http
            .get(format!("{}/{}", self.base_url, path.trim_start_matches('/')));
        self.execute(request).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .header("X-Api-Key", self.api_key.as_str())
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(Duration::from_secs(30))
                } else {
                    ApiError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::map_error(status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Map a non-2xx response to a user-facing error.
    fn map_error(status: StatusCode, body: &str) -> ApiError {
        // Prefer the upstream's own message when the error body is JSON.
        let body_message = serde_json::from_str::<Value>(body).ok().and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        });

        if let Some(message) = body_message {
            return ApiError::Upstream {
                status: status.as_u16(),
                message,
            };
        }

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::PlanRestricted,
            422 => ApiError::InvalidParameters,
            429 => ApiError::RateLimited,
            s => ApiError::Upstream {
                status: s,
                message: format!("Request failed with status {s}"),
            },
        }
    }
}
