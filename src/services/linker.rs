// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity resolution for provider logins.
//!
//! Turns a normalized provider profile plus an optional authenticated caller
//! into exactly one user record. The decision order is link, then existing
//! account, then new account; reordering it would let an authenticated user
//! silently create a duplicate account instead of linking.

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::{Provider, UserPatch, UserRecord};
use crate::services::oauth::ProviderProfile;

/// Resolve a provider profile to a local user record.
pub async fn resolve_identity(
    store: &CredentialStore,
    provider: Provider,
    profile: ProviderProfile,
    authenticated: Option<&AuthUser>,
) -> Result<UserRecord, AppError> {
    // 1. Linking path: an authenticated caller adopts this provider identity,
    //    unless it is already attached to any account.
    if let Some(auth) = authenticated {
        if store.provider_id_exists(provider, &profile.external_id).await {
            return Err(AppError::Conflict(format!(
                "{} profile already linked",
                provider
            )));
        }

        let current = store.get_user(&auth.username).await.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "authenticated user {} missing from store",
                auth.username
            ))
        })?;

        // If another link claims this id between the check above and the
        // update, the store's own uniqueness guard still rejects it.
        let mut patch =
            UserPatch::default().with_provider_id(provider, profile.external_id.clone());
        patch.picture = profile.picture.clone();
        if current.display_name.is_none() {
            patch.display_name = Some(profile.display_name.clone());
        }

        let updated = store.update_user(&auth.username, patch).await?;
        tracing::info!(
            username = %updated.username,
            provider = %provider,
            "Linked provider identity to existing account"
        );
        return Ok(updated);
    }

    // 2. Existing-account path: the identity already belongs to someone.
    if store.provider_id_exists(provider, &profile.external_id).await {
        return Ok(store
            .get_user_by_provider_id(provider, &profile.external_id)
            .await?);
    }

    // 3. New-account path: the username is the profile email when the
    //    provider supplies one, otherwise the display name (Twitter).
    let username = profile
        .email
        .clone()
        .unwrap_or_else(|| profile.display_name.clone());

    let mut record = UserRecord::new(username);
    record.display_name = Some(profile.display_name);
    record.picture = profile.picture;
    UserPatch::default()
        .with_provider_id(provider, profile.external_id)
        .apply(&mut record);

    let saved = store.save_user(record).await?;
    tracing::info!(
        username = %saved.username,
        provider = %provider,
        "Created account from provider profile"
    );
    Ok(saved)
}
