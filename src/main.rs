// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth-Broker API Server
//!
//! Issues and refreshes bearer session tokens and links local accounts to
//! Google, Facebook, and Twitter identities.

use auth_broker::{
    config::Config,
    db::CredentialStore,
    services::{FacebookClient, GoogleClient, TwitterClient},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Auth-Broker API");

    // One HTTP client shared by every provider; each outbound call is bounded.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.provider_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let google = GoogleClient::new(http.clone(), config.google_client_secret.clone());
    let facebook = FacebookClient::new(http.clone(), config.facebook_client_secret.clone());
    let twitter = TwitterClient::new(http, config.twitter_consumer_secret.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store: CredentialStore::new(),
        google,
        facebook,
        twitter,
    });

    // Build router
    let app = auth_broker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auth_broker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
