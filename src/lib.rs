// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth-Broker: bearer session tokens with OAuth identity linking
//!
//! This crate provides an authentication broker that issues, verifies, and
//! refreshes bearer session tokens, and links local accounts to Google,
//! Facebook, and Twitter identities.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod services;
pub mod token;

use config::Config;
use db::CredentialStore;
use services::{FacebookClient, GoogleClient, TwitterClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: CredentialStore,
    pub google: GoogleClient,
    pub facebook: FacebookClient,
    pub twitter: TwitterClient,
}
