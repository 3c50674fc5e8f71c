// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider-agnostic OAuth plumbing.
//!
//! Each provider client normalizes its own response shapes into
//! [`ProviderProfile`] here, so the identity linker never sees
//! provider-specific fields.

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Provider;

/// Normalized provider profile. Transient; only these fields survive into a
/// user record.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub external_id: String,
    pub display_name: String,
    pub picture: Option<String>,
    /// Absent for providers without a stable email (Twitter).
    pub email: Option<String>,
}

/// Check a provider response and parse its JSON body.
pub(crate) async fn expect_json<T: for<'de> Deserialize<'de>>(
    provider: Provider,
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Provider(format!(
            "{}: HTTP {}: {}",
            provider, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Provider(format!("{}: JSON parse error: {}", provider, e)))
}

/// Check a provider response and return its body as text.
pub(crate) async fn expect_text(
    provider: Provider,
    response: reqwest::Response,
) -> Result<String, AppError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(AppError::Provider(format!(
            "{}: HTTP {}: {}",
            provider, status, body
        )));
    }
    Ok(body)
}

/// Decode a `k=v&k2=v2` form-encoded body into pairs.
pub(crate) fn parse_form_pairs(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (form_decode(key), form_decode(value))
        })
        .collect()
}

/// Form decoding is percent-decoding plus `+` as space.
fn form_decode(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    urlencoding::decode(&unplussed)
        .map(|c| c.into_owned())
        .unwrap_or(unplussed)
}
