//! HTTP client for the storefront auth endpoints.
//!
//! The client is bound to a single backend origin and carries a cookie store
//! so the server session cookie rides on every request. Callers get typed
//! responses or an [`ApiError`]; non-success statuses surface the server's
//! `error` field when the body is JSON.

pub mod types;

mod error;
pub use self::error::ApiError;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use self::types::{LoginResponse, SignupResponse, UserRecord};

/// Backend origin used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://ecommerse-assingment-backend.onrender.com";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client bound to `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed, uses a scheme other than
    /// http(s), or the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url)
            .map_err(|err| ApiError::Config(format!("invalid base URL {base_url}: {err}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ApiError::Config(format!(
                    "invalid base URL {base_url}: unsupported scheme {scheme}"
                )))
            }
        }

        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .cookie_store(true)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Register a new account.
    ///
    /// # Errors
    /// Returns an error if the request fails, the backend returns a
    /// non-success status, or the response cannot be decoded.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<SignupResponse, ApiError> {
        let payload = json!({
            "name": name,
            "email": email,
            "password": password.expose_secret(),
        });

        let url = self.endpoint_url("/auth/signup");
        debug!("signup request: POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(map_request_error)?;

        handle_json_response(response).await
    }

    /// Exchange credentials for a server session.
    ///
    /// # Errors
    /// Returns an error if the request fails, the backend returns a
    /// non-success status, or the response cannot be decoded.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let payload = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let url = self.endpoint_url("/auth/login");
        debug!("login request: POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(map_request_error)?;

        handle_json_response(response).await
    }

    /// Invalidate the server session. The response body is unused.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend returns a
    /// non-success status.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint_url("/auth/logout");
        debug!("logout request: POST {}", url);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(map_request_error)?;

        handle_empty_response(response).await
    }

    /// Fetch a user's record by id.
    ///
    /// # Errors
    /// Returns an error if the request fails, the backend returns a
    /// non-success status, or the response cannot be decoded.
    pub async fn fetch_user(&self, user_id: &str) -> Result<UserRecord, ApiError> {
        let url = self.endpoint_url(&format!("/auth/user/{user_id}"));
        debug!("user lookup: GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_request_error)?;

        handle_json_response(response).await
    }
}

/// Maps transport errors into [`ApiError`] variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("request timed out".to_string())
    } else {
        ApiError::Network(format!("unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("failed to decode response: {err}")))
    } else {
        Err(error_from_response(response).await)
    }
}

/// Handles empty responses and returns sanitized HTTP errors when needed.
async fn handle_empty_response(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Http {
        status,
        message: error_message(&body),
    }
}

/// Prefer the server's `error` field, fall back to the trimmed body text.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
