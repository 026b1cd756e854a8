//! Sign-in, registration and the signed-in shopper's profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{Bearer, ValidatedJson};
use super::{AppResult, AppState};
use crate::domain::aggregates::{Account, AuthToken, LoginForm, NewAccount, RegisterForm};

pub async fn login(State(s): State<AppState>, ValidatedJson(form): ValidatedJson<LoginForm>) -> AppResult<Json<AuthToken>> {
    let form = LoginForm { email: form.email.trim().to_lowercase(), ..form };
    let token = s.api.login(&form).await?;
    tracing::info!(account_id = token.account.id, role = ?token.account.role, "signed in");
    Ok(Json(token))
}

pub async fn register(State(s): State<AppState>, ValidatedJson(form): ValidatedJson<RegisterForm>) -> AppResult<(StatusCode, Json<Account>)> {
    let account = s.api.register(&NewAccount::from(form)).await?;
    tracing::info!(account_id = account.id, "account registered");
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn me(State(s): State<AppState>, auth: Bearer) -> AppResult<Json<Account>> {
    Ok(Json(auth.session(&s.api).me().await?))
}
