// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Twitter OAuth1 client.
//!
//! Twitter is the one provider without an OAuth2 code exchange: the flow is
//! a two-step OAuth1 handshake (request token, then verifier exchange), and
//! every call must carry an HMAC-SHA1 request signature.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AppError;
use crate::models::Provider;
use crate::services::oauth::{expect_json, expect_text, parse_form_pairs, ProviderProfile};

const REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
const ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";
const PROFILE_URL: &str = "https://api.twitter.com/1.1/account/verify_credentials.json";

/// Twitter OAuth1 client.
#[derive(Clone)]
pub struct TwitterClient {
    http: reqwest::Client,
    consumer_secret: String,
    rng: SystemRandom,
    request_token_url: String,
    access_token_url: String,
    profile_url: String,
}

/// OAuth1 access token returned by the verifier exchange.
#[derive(Debug, Clone)]
pub struct TwitterAccessToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

#[derive(Deserialize)]
struct TwitterProfile {
    id_str: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    screen_name: Option<String>,
    #[serde(default)]
    profile_image_url_https: Option<String>,
}

impl TwitterClient {
    pub fn new(http: reqwest::Client, consumer_secret: String) -> Self {
        Self {
            http,
            consumer_secret,
            rng: SystemRandom::new(),
            request_token_url: REQUEST_TOKEN_URL.to_string(),
            access_token_url: ACCESS_TOKEN_URL.to_string(),
            profile_url: PROFILE_URL.to_string(),
        }
    }

    /// Override endpoint URLs (tests point these at a local server).
    pub fn with_urls(
        mut self,
        request_token_url: String,
        access_token_url: String,
        profile_url: String,
    ) -> Self {
        self.request_token_url = request_token_url;
        self.access_token_url = access_token_url;
        self.profile_url = profile_url;
        self
    }

    /// Step 1: obtain a request token for the client redirect.
    ///
    /// Returns the provider's form-encoded response decoded into pairs
    /// (`oauth_token`, `oauth_token_secret`, `oauth_callback_confirmed`).
    pub async fn request_token(
        &self,
        consumer_key: &str,
        callback_url: &str,
    ) -> Result<Vec<(String, String)>, AppError> {
        let url = self.request_token_url.clone();
        let authorization = self.sign_request(
            "POST",
            &url,
            consumer_key,
            &[("oauth_callback", callback_url)],
            None,
        )?;

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("twitter: request token failed: {}", e)))?;

        let body = expect_text(Provider::Twitter, response).await?;
        Ok(parse_form_pairs(&body))
    }

    /// Step 2: exchange an authorized request token and verifier for an
    /// access token.
    pub async fn access_token(
        &self,
        consumer_key: &str,
        oauth_token: &str,
        oauth_verifier: &str,
    ) -> Result<TwitterAccessToken, AppError> {
        let url = self.access_token_url.clone();
        let authorization = self.sign_request(
            "POST",
            &url,
            consumer_key,
            &[("oauth_token", oauth_token), ("oauth_verifier", oauth_verifier)],
            None,
        )?;

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("twitter: access token failed: {}", e)))?;

        let body = expect_text(Provider::Twitter, response).await?;
        let pairs = parse_form_pairs(&body);
        let find = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| {
                    AppError::Provider(format!("twitter: access token response missing {}", key))
                })
        };

        Ok(TwitterAccessToken {
            oauth_token: find("oauth_token")?,
            oauth_token_secret: find("oauth_token_secret")?,
        })
    }

    /// Fetch the authenticated user's profile with the access token.
    pub async fn fetch_profile(
        &self,
        consumer_key: &str,
        access: &TwitterAccessToken,
    ) -> Result<ProviderProfile, AppError> {
        let url = self.profile_url.clone();
        let authorization = self.sign_request(
            "GET",
            &url,
            consumer_key,
            &[("oauth_token", access.oauth_token.as_str())],
            Some(&access.oauth_token_secret),
        )?;

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("twitter: profile fetch failed: {}", e)))?;

        let profile: TwitterProfile = expect_json(Provider::Twitter, response).await?;
        let display_name = profile
            .name
            .or(profile.screen_name)
            .unwrap_or_else(|| profile.id_str.clone());

        Ok(ProviderProfile {
            external_id: profile.id_str,
            display_name,
            picture: profile.profile_image_url_https,
            // Twitter exposes no stable email.
            email: None,
        })
    }

    /// Build a signed `Authorization: OAuth ...` header value.
    fn sign_request(
        &self,
        method: &str,
        url: &str,
        consumer_key: &str,
        extra: &[(&str, &str)],
        token_secret: Option<&str>,
    ) -> Result<String, AppError> {
        let mut nonce_bytes = [0u8; 16];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("nonce generation failed")))?;
        let nonce = hex::encode(nonce_bytes);

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string();

        let mut params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".to_string(), consumer_key.to_string()),
            ("oauth_nonce".to_string(), nonce),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        for (k, v) in extra {
            params.push((k.to_string(), v.to_string()));
        }

        let base = signature_base_string(method, url, &params);
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(token_secret.unwrap_or(""))
        );

        let key = ring::hmac::Key::new(
            ring::hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            signing_key.as_bytes(),
        );
        let tag = ring::hmac::sign(&key, base.as_bytes());
        let signature = STANDARD.encode(tag.as_ref());

        params.push(("oauth_signature".to_string(), signature));
        params.sort();

        let header_params = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header_params))
    }
}

/// RFC 3986 percent-encoding (unreserved characters pass through).
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// OAuth1 signature base string: method, encoded URL, and the encoded,
/// sorted parameter string joined with `&`.
fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}
