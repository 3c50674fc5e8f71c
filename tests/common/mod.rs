// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use auth_broker::config::Config;
use auth_broker::db::CredentialStore;
use auth_broker::models::UserRecord;
use auth_broker::routes::create_router;
use auth_broker::services::{FacebookClient, GoogleClient, TwitterClient};
use auth_broker::AppState;
use std::sync::Arc;

/// Create a test app with an empty in-memory store. Returns the router and
/// the shared state so tests can seed users directly.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let http = reqwest::Client::new();

    let google = GoogleClient::new(http.clone(), config.google_client_secret.clone());
    let facebook = FacebookClient::new(http.clone(), config.facebook_client_secret.clone());
    let twitter = TwitterClient::new(http, config.twitter_consumer_secret.clone());

    let state = Arc::new(AppState {
        config,
        store: CredentialStore::new(),
        google,
        facebook,
        twitter,
    });

    (create_router(state.clone()), state)
}

/// Seed a password account and return its record.
#[allow(dead_code)]
pub async fn seed_password_user(state: &AppState, username: &str, password: &str) -> UserRecord {
    let mut record = UserRecord::new(username);
    record.password_hash = Some(
        auth_broker::password::hash(password.to_string())
            .await
            .expect("hashing failed"),
    );
    state
        .store
        .save_user(record)
        .await
        .expect("seeding user failed")
}

/// Mint a token with an arbitrary expiry, mirroring the issuer's claims.
#[allow(dead_code)]
pub fn mint_token(username: &str, exp_offset_secs: i64, secret: &[u8]) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = auth_broker::token::Claims {
        username: username.to_string(),
        display_name: None,
        picture: None,
        iat: (now - 3600) as u64,
        exp: (now + exp_offset_secs) as u64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("Failed to mint token")
}
