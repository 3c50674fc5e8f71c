// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication flow handlers.
//!
//! Each handler is a stateless request-to-response mapping; all shared state
//! lives in the credential store. Failures map to exactly one HTTP outcome
//! through [`AppError`].

use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::MaybeUser;
use crate::models::{Provider, UserRecord};
use crate::services::linker::resolve_identity;
use crate::services::oauth::ProviderProfile;
use crate::{password, token, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/refresh", get(refresh))
        .route("/google", post(google))
        .route("/facebook", post(facebook))
        .route("/twitter", post(twitter))
}

/// Credentials body shared by login and signup.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsBody {
    #[validate(length(min = 3, max = 64))]
    username: String,
    #[validate(length(min = 6, max = 128))]
    password: String,
}

/// OAuth2 body shared by the Google and Facebook flows.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Body {
    code: String,
    client_id: String,
    redirect_uri: String,
}

/// Twitter body; which handshake step is requested is detected purely from
/// the presence of `oauth_token` and `oauth_verifier`.
#[derive(Debug, Deserialize)]
pub struct TwitterBody {
    #[serde(rename = "clientId")]
    client_id: String,
    #[serde(rename = "redirectUri", default)]
    redirect_uri: Option<String>,
    #[serde(default)]
    oauth_token: Option<String>,
    #[serde(default)]
    oauth_verifier: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    token: String,
}

fn token_response(state: &AppState, user: &UserRecord) -> Result<Json<TokenResponse>> {
    let token = token::issue(user, &state.config.token_secret, state.config.token_ttl_secs)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /signup — create a password account and issue a session token.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<TokenResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut record = UserRecord::new(body.username);
    record.password_hash = Some(password::hash(body.password).await?);

    let saved = state.store.save_user(record).await?;
    tracing::info!(username = %saved.username, "Account created");
    token_response(&state, &saved)
}

/// POST /login — verify credentials and issue a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<TokenResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // The same 401 covers unknown users, provider-only accounts with no
    // password set, and mismatches.
    let unauthorized = || AppError::Unauthorized("bad username or password".to_string());

    let user = state
        .store
        .get_user(&body.username)
        .await
        .ok_or_else(unauthorized)?;
    let hash = user.password_hash.clone().ok_or_else(unauthorized)?;

    if !password::verify(body.password, hash).await? {
        return Err(unauthorized());
    }

    token_response(&state, &user)
}

/// GET /refresh — exchange a recently expired token for a fresh one.
async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("no token".to_string()))?;

    let claims = token::verify(bearer, &state.config.token_secret, true)
        .map_err(|_| AppError::BadRequest("invalid token".to_string()))?;

    if !token::within_refresh_window(&claims) {
        return Err(AppError::BadRequest("outdated token".to_string()));
    }

    // Re-fetch so the fresh token carries the current profile.
    let user = state
        .store
        .get_user(&claims.username)
        .await
        .ok_or_else(|| AppError::BadRequest("user does not exist".to_string()))?;

    token_response(&state, &user)
}

/// POST /google — OAuth2 link-or-login.
async fn google(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<OAuth2Body>,
) -> Result<Json<TokenResponse>> {
    let access_token = state
        .google
        .exchange_code(&body.code, &body.client_id, &body.redirect_uri)
        .await?;
    let profile = state.google.fetch_profile(&access_token).await?;
    provider_login(&state, Provider::Google, profile, user).await
}

/// POST /facebook — OAuth2 link-or-login.
async fn facebook(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<OAuth2Body>,
) -> Result<Json<TokenResponse>> {
    let access_token = state
        .facebook
        .exchange_code(&body.code, &body.client_id, &body.redirect_uri)
        .await?;
    let profile = state.facebook.fetch_profile(&access_token).await?;
    provider_login(&state, Provider::Facebook, profile, user).await
}

/// POST /twitter — two-step OAuth1 link-or-login.
///
/// Step 1 (no `oauth_token`/`oauth_verifier`) returns the request token for
/// the client redirect; step 2 exchanges the verifier, fetches the profile,
/// and runs the same linker decision order as the OAuth2 flows.
async fn twitter(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<TwitterBody>,
) -> Result<Json<serde_json::Value>> {
    let (oauth_token, oauth_verifier) = match (&body.oauth_token, &body.oauth_verifier) {
        (Some(t), Some(v)) => (t.clone(), v.clone()),
        _ => {
            // Step 1: hand the request token back as a decoded form object.
            let callback = body.redirect_uri.clone().ok_or_else(|| {
                AppError::Validation("redirectUri is required for the first step".to_string())
            })?;
            let pairs = state
                .twitter
                .request_token(&body.client_id, &callback)
                .await?;
            let object: serde_json::Map<String, serde_json::Value> = pairs
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            return Ok(Json(serde_json::Value::Object(object)));
        }
    };

    let access = state
        .twitter
        .access_token(&body.client_id, &oauth_token, &oauth_verifier)
        .await?;
    let profile = state.twitter.fetch_profile(&body.client_id, &access).await?;

    let Json(TokenResponse { token }) =
        provider_login(&state, Provider::Twitter, profile, user).await?;
    Ok(Json(serde_json::json!({ "token": token })))
}

/// Shared tail of every provider flow: resolve the identity, issue a token.
async fn provider_login(
    state: &AppState,
    provider: Provider,
    profile: ProviderProfile,
    user: Option<crate::middleware::auth::AuthUser>,
) -> Result<Json<TokenResponse>> {
    let record = resolve_identity(&state.store, provider, profile, user.as_ref()).await?;
    token_response(state, &record)
}
