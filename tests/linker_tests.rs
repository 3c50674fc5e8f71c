// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity linker decision-order tests: link, then existing, then new.

use auth_broker::db::CredentialStore;
use auth_broker::error::AppError;
use auth_broker::middleware::auth::AuthUser;
use auth_broker::models::{Provider, UserRecord};
use auth_broker::services::linker::resolve_identity;
use auth_broker::services::ProviderProfile;

fn google_profile(sub: &str, email: &str) -> ProviderProfile {
    ProviderProfile {
        external_id: sub.to_string(),
        display_name: "Alice".to_string(),
        picture: Some("https://example.com/a.png?sz=200".to_string()),
        email: Some(email.to_string()),
    }
}

fn auth(username: &str) -> AuthUser {
    AuthUser {
        username: username.to_string(),
    }
}

#[tokio::test]
async fn anonymous_flow_creates_then_reuses_account() {
    let store = CredentialStore::new();

    // First anonymous login: new account keyed by the profile email.
    let created = resolve_identity(&store, Provider::Google, google_profile("g1", "a@x.com"), None)
        .await
        .unwrap();
    assert_eq!(created.username, "a@x.com");
    assert_eq!(created.google_id.as_deref(), Some("g1"));
    assert_eq!(created.display_name.as_deref(), Some("Alice"));

    // Second login with the same sub resolves to the same account.
    let resolved = resolve_identity(&store, Provider::Google, google_profile("g1", "a@x.com"), None)
        .await
        .unwrap();
    assert_eq!(resolved.username, "a@x.com");
}

#[tokio::test]
async fn twitter_account_keyed_by_display_name() {
    let store = CredentialStore::new();
    let profile = ProviderProfile {
        external_id: "t1".to_string(),
        display_name: "tweeter".to_string(),
        picture: None,
        email: None, // Twitter exposes no stable email
    };

    let created = resolve_identity(&store, Provider::Twitter, profile, None)
        .await
        .unwrap();
    assert_eq!(created.username, "tweeter");
    assert_eq!(created.twitter_id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn authenticated_caller_links_identity() {
    let store = CredentialStore::new();
    store.save_user(UserRecord::new("bob")).await.unwrap();

    let linked = resolve_identity(
        &store,
        Provider::Facebook,
        ProviderProfile {
            external_id: "f1".to_string(),
            display_name: "Bob F".to_string(),
            picture: Some("https://graph.example/bob.jpg".to_string()),
            email: Some("bob@x.com".to_string()),
        },
        Some(&auth("bob")),
    )
    .await
    .unwrap();

    // Linked onto the existing account, not a new one.
    assert_eq!(linked.username, "bob");
    assert_eq!(linked.facebook_id.as_deref(), Some("f1"));
    assert_eq!(linked.picture.as_deref(), Some("https://graph.example/bob.jpg"));
    // Record had no display name, so the profile's is adopted.
    assert_eq!(linked.display_name.as_deref(), Some("Bob F"));

    let by_id = store
        .get_user_by_provider_id(Provider::Facebook, "f1")
        .await
        .unwrap();
    assert_eq!(by_id.username, "bob");
}

#[tokio::test]
async fn linking_preserves_existing_display_name() {
    let store = CredentialStore::new();
    let mut bob = UserRecord::new("bob");
    bob.display_name = Some("Robert".to_string());
    store.save_user(bob).await.unwrap();

    let linked = resolve_identity(
        &store,
        Provider::Google,
        google_profile("g7", "bob@x.com"),
        Some(&auth("bob")),
    )
    .await
    .unwrap();

    assert_eq!(linked.display_name.as_deref(), Some("Robert"));
    assert_eq!(linked.google_id.as_deref(), Some("g7"));
}

#[tokio::test]
async fn linking_already_claimed_identity_conflicts() {
    let store = CredentialStore::new();

    let mut carol = UserRecord::new("carol");
    carol.facebook_id = Some("f1".to_string());
    store.save_user(carol).await.unwrap();
    store.save_user(UserRecord::new("bob")).await.unwrap();

    let err = resolve_identity(
        &store,
        Provider::Facebook,
        ProviderProfile {
            external_id: "f1".to_string(),
            display_name: "Bob F".to_string(),
            picture: None,
            email: None,
        },
        Some(&auth("bob")),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));

    // Bob's record is untouched by the failed link.
    let bob = store.get_user("bob").await.unwrap();
    assert!(bob.facebook_id.is_none());
}

#[tokio::test]
async fn link_wins_over_existing_account_resolution() {
    // An authenticated caller whose provider id is unmapped must link, even
    // though an anonymous caller with the same profile would create a user.
    let store = CredentialStore::new();
    store.save_user(UserRecord::new("bob")).await.unwrap();

    let record = resolve_identity(
        &store,
        Provider::Google,
        google_profile("g9", "new-address@x.com"),
        Some(&auth("bob")),
    )
    .await
    .unwrap();

    assert_eq!(record.username, "bob");
    assert!(store.get_user("new-address@x.com").await.is_none());
}

#[tokio::test]
async fn new_account_with_taken_email_conflicts() {
    let store = CredentialStore::new();
    store.save_user(UserRecord::new("a@x.com")).await.unwrap();

    let err = resolve_identity(&store, Provider::Google, google_profile("g1", "a@x.com"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
