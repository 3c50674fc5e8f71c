// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth2 client (authorization-code exchange + OpenID Connect profile).

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Provider;
use crate::services::oauth::{expect_json, ProviderProfile};

const TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v3/token";
const PROFILE_URL: &str = "https://www.googleapis.com/plus/v1/people/me/openIdConnect";

/// Google OAuth2 client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_secret: String,
    token_url: String,
    profile_url: String,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleProfile {
    /// Stable Google account id.
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl GoogleClient {
    pub fn new(http: reqwest::Client, client_secret: String) -> Self {
        Self {
            http,
            client_secret,
            token_url: TOKEN_URL.to_string(),
            profile_url: PROFILE_URL.to_string(),
        }
    }

    /// Override endpoint URLs (tests point these at a local server).
    pub fn with_urls(mut self, token_url: String, profile_url: String) -> Self {
        self.token_url = token_url;
        self.profile_url = profile_url;
        self
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
    ) -> Result<String, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", client_id),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("google: token exchange failed: {}", e)))?;

        let token: AccessTokenResponse = expect_json(Provider::Google, response).await?;
        Ok(token.access_token)
    }

    /// Fetch the user's OpenID Connect profile.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .http
            .get(&self.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("google: profile fetch failed: {}", e)))?;

        let profile: GoogleProfile = expect_json(Provider::Google, response).await?;
        let display_name = profile
            .name
            .or_else(|| profile.email.clone())
            .unwrap_or_default();

        Ok(ProviderProfile {
            external_id: profile.sub,
            display_name,
            picture: profile.picture.as_deref().map(enlarge_picture),
            email: profile.email,
        })
    }
}

/// Google avatar URLs embed a size token; rewrite the 50px default to 200px
/// before the URL is stored.
fn enlarge_picture(url: &str) -> String {
    url.replace("sz=50", "sz=200")
}
