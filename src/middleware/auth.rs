// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Optional bearer-token authentication.
//!
//! Provider flows accept both anonymous and authenticated callers, so the
//! token is parsed but never required: a missing or invalid bearer token
//! yields `None` rather than a rejection. Flows that do require a token
//! (refresh) parse the header themselves.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;
use std::sync::Arc;

use crate::{token, AppState};

/// Caller identity proven by a valid session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Extractor for optionally-authenticated routes.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(bearer) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        else {
            return Ok(MaybeUser(None));
        };

        match token::verify(bearer, &state.config.token_secret, false) {
            Ok(claims) => Ok(MaybeUser(Some(AuthUser {
                username: claims.username,
            }))),
            Err(err) => {
                // Only a valid token counts as authenticated; anything else
                // is treated as an anonymous request.
                tracing::debug!(error = %err, "Ignoring unusable bearer token");
                Ok(MaybeUser(None))
            }
        }
    }
}
