//! Dynatrace API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Resource operations live on the services and model traits.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::error::{DynatraceError, Result};
use crate::service::EntityService;

const USER_AGENT: &str = concat!("dtapi/", env!("CARGO_PKG_VERSION"));

/// Low-level Dynatrace API client.
///
/// Handles authentication and HTTP requests against one Dynatrace
/// environment. Entity operations are reached through [`DynatraceClient::entities`]
/// or the `Get` and `List` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use dtapi::DynatraceClient;
///
/// # fn example() -> dtapi::Result<()> {
/// // Create from environment variables
/// let client = DynatraceClient::from_env()?;
///
/// // Or configure manually
/// let client = DynatraceClient::new("dt0c01.token", "https://abc12345.live.dynatrace.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DynatraceClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for DynatraceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynatraceClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl DynatraceClient {
    /// Create a client from environment variables.
    ///
    /// Uses `DT_API_TOKEN` for authentication and `DT_ENV_URL` for the
    /// environment base URL (e.g. `https://abc12345.live.dynatrace.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("DT_API_TOKEN").map_err(|_| {
            DynatraceError::ConfigMissing("DT_API_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("DT_ENV_URL").map_err(|_| {
            DynatraceError::ConfigMissing("DT_ENV_URL environment variable not set".to_string())
        })?;

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided API token and environment URL.
    ///
    /// # Arguments
    ///
    /// * `token` - Dynatrace API token
    /// * `base_url` - Environment URL; a managed prefix such as `/e/<env-id>` is kept
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with / so relative joins keep any path prefix
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(DynatraceError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Entity and entity type operations bound to this client.
    pub fn entities(&self) -> EntityService<'_> {
        EntityService::new(self)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url_for(path)?;

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(DynatraceError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.url_for(path)?;

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(query)
            .send()
            .await
            .map_err(DynatraceError::HttpError)?;

        Self::check_response(response).await
    }

    /// Resolve an API path against the environment URL.
    ///
    /// Paths are accepted with or without a leading `/`.
    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn auth_header(&self) -> String {
        format!("Api-Token {}", self.token)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(DynatraceError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(DynatraceError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    ///
    /// Dynatrace wraps errors as `{"error": {"code": .., "message": ..}}`.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return msg.to_string();
            }
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}
