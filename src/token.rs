// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token issuing and verification.
//!
//! Tokens are stateless HS256 JWTs carrying a redacted projection of the
//! user record; nothing is stored server-side and expiry is the only
//! invalidation mechanism.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::UserRecord;

/// How long past expiry a token is still accepted for refresh.
pub const REFRESH_GRACE_SECS: u64 = 10 * 60;

/// Session token claims. Never includes password hashes or provider ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Token verification failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed or tampered token (wrong signature, bad encoding).
    #[error("Invalid token")]
    InvalidSignature,

    /// Signature-valid token past its expiry.
    #[error("Expired token")]
    Expired,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign a bearer token for `user`, expiring `ttl_secs` from now.
pub fn issue(user: &UserRecord, secret: &[u8], ttl_secs: u64) -> anyhow::Result<String> {
    let now = unix_now();
    let claims = Claims {
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        picture: user.picture.clone(),
        iat: now,
        exp: now + ttl_secs,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Decode and check a bearer token.
///
/// With `ignore_expiration` set, a token past its expiry still decodes; the
/// refresh flow uses this together with [`within_refresh_window`].
pub fn verify(token: &str, secret: &[u8], ignore_expiration: bool) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = !ignore_expiration;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(err) => match err.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::InvalidSignature),
        },
    }
}

/// Whether `claims` expired recently enough to be exchanged for a fresh token.
pub fn within_refresh_window(claims: &Claims) -> bool {
    claims.exp + REFRESH_GRACE_SECS >= unix_now()
}
