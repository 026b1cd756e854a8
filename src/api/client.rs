//! HTTP client for the remote commerce API.
//!
//! Wraps the REST endpoints the storefront consumes using [`reqwest`]. Every
//! call is tagged with a fresh `X-Request-Id` so upstream logs can be matched
//! with ours.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors from the remote API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, bad JSON).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Shared client for the remote API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// An [`ApiClient`] borrowed together with the shopper's bearer token.
#[derive(Clone, Copy, Debug)]
pub struct Session<'a> {
    pub(crate) api: &'a ApiClient,
    pub(crate) token: &'a str,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`, e.g. `http://host:5000/api`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn session<'a>(&'a self, token: &'a str) -> Session<'a> { Session { api: self, token } }

    // ---- request helpers ----

    /// `GET` a JSON document with optional query pairs.
    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: &Q, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.dispatch(Method::GET, path, token, |req| req.query(query)).await?;
        Ok(response.json::<T>().await?)
    }

    /// `GET` for the side effect only; the reply body is ignored.
    pub(crate) async fn get_discard<Q>(&self, path: &str, query: &Q, token: Option<&str>) -> Result<(), ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.dispatch(Method::GET, path, token, |req| req.query(query)).await?;
        Ok(())
    }

    /// Send a JSON body and parse the JSON reply.
    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(method, path, token, |req| req.json(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a JSON body and discard whatever the API replies.
    pub(crate) async fn send_discard<B>(&self, method: Method, path: &str, body: &B, token: Option<&str>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(method, path, token, |req| req.json(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        self.dispatch(Method::DELETE, path, token, |req| req).await?;
        Ok(())
    }

    /// Issue one request and turn non-2xx replies into [`ApiError::Status`].
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        decorate: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let request_id = Uuid::new_v4();
        let mut builder = self
            .client
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = decorate(builder).send().await.map_err(|e| {
            tracing::warn!(%request_id, %method, path, error = %e, "upstream request failed");
            ApiError::from(e)
        })?;
        tracing::debug!(%request_id, %method, path, status = response.status().as_u16(), "upstream call");
        Self::ensure_success(response).await
    }

    /// Returns the response unchanged on success, or an [`ApiError::Status`]
    /// carrying the most useful message the body offers.
    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string()),
        })
    }
}

/// Pulls `message`, `title` or `error` from a JSON error body, or falls back
/// to the first 200 characters of plain text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        return ["message", "title", "error"]
            .iter()
            .find_map(|k| map.get(*k).and_then(|v| v.as_str()))
            .map(str::to_string);
    }
    Some(body.chars().take(200).collect())
}
