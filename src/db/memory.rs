// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory credential store.
//!
//! Holds the primary username map and the per-provider identity index behind
//! a single lock, so every operation is atomic with respect to both maps:
//! no concurrent reader can observe a half-written record or a partially
//! updated index.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::{Provider, UserPatch, UserRecord};

/// Errors surfaced by store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Provider identity already linked to another account")]
    DuplicateProviderId,

    #[error("User was not found")]
    UserNotFound,
}

impl From<StoreError> for crate::error::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => {
                crate::error::AppError::Conflict("username already exists".to_string())
            }
            StoreError::DuplicateProviderId => crate::error::AppError::Conflict(
                "provider identity already linked to another account".to_string(),
            ),
            // A NotFound that escapes a flow unchecked means a stale index
            // entry or a vanished user, which is an internal inconsistency.
            StoreError::UserNotFound => crate::error::AppError::Internal(anyhow::anyhow!(
                "credential store lookup failed: user was not found"
            )),
        }
    }
}

#[derive(Default)]
struct StoreInner {
    /// username -> record
    users: HashMap<String, UserRecord>,
    /// (provider, external id) -> username
    identities: HashMap<(Provider, String), String>,
}

const ALL_PROVIDERS: [Provider; 3] = [Provider::Google, Provider::Facebook, Provider::Twitter];

impl StoreInner {
    /// Every provider id on `record` must be unmapped or already owned by
    /// this username; the index stays 1:1.
    fn check_provider_ids_free(&self, record: &UserRecord) -> Result<(), StoreError> {
        for provider in ALL_PROVIDERS {
            if let Some(id) = record.provider_id(provider) {
                if let Some(owner) = self.identities.get(&(provider, id.to_string())) {
                    if owner != &record.username {
                        return Err(StoreError::DuplicateProviderId);
                    }
                }
            }
        }
        Ok(())
    }

    /// Index every provider id present on `record`.
    fn index_provider_ids(&mut self, record: &UserRecord) {
        for provider in ALL_PROVIDERS {
            if let Some(id) = record.provider_id(provider) {
                self.identities
                    .insert((provider, id.to_string()), record.username.clone());
            }
        }
    }
}

/// Shared, process-lifetime credential store.
#[derive(Default)]
pub struct CredentialStore {
    inner: RwLock<StoreInner>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new record. Fails if the username is already taken, or if any
    /// provider id on the record is already claimed by another account.
    pub async fn save_user(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&record.username) {
            return Err(StoreError::DuplicateUsername);
        }
        inner.check_provider_ids_free(&record)?;
        inner.index_provider_ids(&record);
        inner.users.insert(record.username.clone(), record.clone());
        Ok(record)
    }

    /// Fetch a record by username. Absence is not an error.
    pub async fn get_user(&self, username: &str) -> Option<UserRecord> {
        self.inner.read().await.users.get(username).cloned()
    }

    /// Merge `patch` into an existing record and re-index its provider ids.
    ///
    /// Fails without touching the record if the patch would claim a provider
    /// id already indexed to a different username; the check and the write
    /// happen under one guard, so concurrent link attempts for the same
    /// external id cannot both succeed.
    pub async fn update_user(
        &self,
        username: &str,
        patch: UserPatch,
    ) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let mut record = inner
            .users
            .get(username)
            .cloned()
            .ok_or(StoreError::UserNotFound)?;
        patch.apply(&mut record);
        inner.check_provider_ids_free(&record)?;
        inner.index_provider_ids(&record);
        inner.users.insert(record.username.clone(), record.clone());
        Ok(record)
    }

    /// Resolve an external provider identity to its linked record.
    ///
    /// Fails when no mapping exists, and also when the mapping is stale
    /// (pointing at a username no longer present); a stale index entry must
    /// never silently turn into a fresh account.
    pub async fn get_user_by_provider_id(
        &self,
        provider: Provider,
        external_id: &str,
    ) -> Result<UserRecord, StoreError> {
        let inner = self.inner.read().await;
        let username = inner
            .identities
            .get(&(provider, external_id.to_string()))
            .ok_or(StoreError::UserNotFound)?;
        inner
            .users
            .get(username)
            .cloned()
            .ok_or(StoreError::UserNotFound)
    }

    /// Whether any record holds `external_id` for `provider`.
    pub async fn provider_id_exists(&self, provider: Provider, external_id: &str) -> bool {
        self.inner
            .read()
            .await
            .identities
            .contains_key(&(provider, external_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str) -> UserRecord {
        UserRecord::new(username)
    }

    #[tokio::test]
    async fn save_then_get_returns_copy() {
        let store = CredentialStore::new();
        let mut alice = record("alice");
        alice.display_name = Some("Alice".to_string());

        let saved = store.save_user(alice).await.unwrap();
        assert_eq!(saved.username, "alice");

        let mut fetched = store.get_user("alice").await.unwrap();
        // Mutating the returned copy must not leak into the store.
        fetched.display_name = Some("Mallory".to_string());
        let again = store.get_user("alice").await.unwrap();
        assert_eq!(again.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn update_merges_only_set_fields() {
        let store = CredentialStore::new();
        let mut alice = record("alice");
        alice.display_name = Some("Alice".to_string());
        alice.picture = Some("pic-v1".to_string());
        store.save_user(alice).await.unwrap();

        let updated = store
            .update_user(
                "alice",
                UserPatch {
                    picture: Some("pic-v2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Alice"));
        assert_eq!(updated.picture.as_deref(), Some("pic-v2"));
    }

    #[tokio::test]
    async fn update_missing_user_fails() {
        let store = CredentialStore::new();
        let err = store
            .update_user("ghost", UserPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::UserNotFound);
    }

    #[tokio::test]
    async fn provider_index_follows_save_and_update() {
        let store = CredentialStore::new();
        let mut alice = record("alice");
        alice.google_id = Some("g1".to_string());
        store.save_user(alice).await.unwrap();

        assert!(store.provider_id_exists(Provider::Google, "g1").await);
        assert!(!store.provider_id_exists(Provider::Facebook, "g1").await);
        let by_id = store
            .get_user_by_provider_id(Provider::Google, "g1")
            .await
            .unwrap();
        assert_eq!(by_id.username, "alice");

        store
            .update_user(
                "alice",
                UserPatch::default().with_provider_id(Provider::Twitter, "t9"),
            )
            .await
            .unwrap();
        let by_twitter = store
            .get_user_by_provider_id(Provider::Twitter, "t9")
            .await
            .unwrap();
        assert_eq!(by_twitter.username, "alice");
    }

    #[tokio::test]
    async fn unmapped_provider_id_fails() {
        let store = CredentialStore::new();
        let err = store
            .get_user_by_provider_id(Provider::Google, "nope")
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::UserNotFound);
    }
}
