//! Request extractors: bearer tokens and validated bodies/queries.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::{async_trait, Json};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{ApiClient, Session, StorefrontError};

/// Bearer token forwarded unchanged to the remote API.
#[derive(Debug, Clone)]
pub struct Bearer(pub String);

impl Bearer {
    pub fn session<'a>(&'a self, api: &'a ApiClient) -> Session<'a> { api.session(&self.0) }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Bearer {
    type Rejection = StorefrontError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).ok_or(StorefrontError::Unauthorized)?;
        let (scheme, token) = header.split_once(' ').ok_or(StorefrontError::Unauthorized)?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(StorefrontError::Unauthorized);
        }
        Ok(Self(token.to_string()))
    }
}

/// JSON body that has passed its `validator` rules. Invalid bodies are
/// rejected before the handler runs, so nothing reaches the upstream.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = StorefrontError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| StorefrontError::Validation(e.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = StorefrontError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await.map_err(|e| StorefrontError::Validation(e.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
