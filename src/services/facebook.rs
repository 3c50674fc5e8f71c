// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facebook OAuth2 client (Graph API).

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Provider;
use crate::services::oauth::{expect_json, ProviderProfile};

const TOKEN_URL: &str = "https://graph.facebook.com/v2.5/oauth/access_token";
const PROFILE_URL: &str = "https://graph.facebook.com/v2.5/me";
const PROFILE_FIELDS: &str = "id,email,first_name,last_name,link,name,picture";

/// Facebook Graph API client.
#[derive(Clone)]
pub struct FacebookClient {
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
struct FacebookProfile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<PictureWrapper>,
}

/// Graph API nests the avatar URL as `picture.data.url`.
#[derive(Deserialize)]
struct PictureWrapper {
    data: PictureData,
}

#[derive(Deserialize)]
struct PictureData {
    url: String,
}

impl FacebookClient {
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
            .get(&self.token_url)
            .query(&[
                ("code", code),
                ("client_id", client_id),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("facebook: token exchange failed: {}", e)))?;

        let token: AccessTokenResponse = expect_json(Provider::Facebook, response).await?;
        Ok(token.access_token)
    }

    /// Fetch the user's Graph API profile.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .http
            .get(&self.profile_url)
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("facebook: profile fetch failed: {}", e)))?;

        let profile: FacebookProfile = expect_json(Provider::Facebook, response).await?;
        let display_name = profile
            .name
            .or_else(|| profile.email.clone())
            .unwrap_or_default();

        Ok(ProviderProfile {
            external_id: profile.id,
            display_name,
            picture: profile.picture.map(|p| p.data.url),
            email: profile.email,
        })
    }
}
