//! Local account records and provider identities.

use serde::{Deserialize, Serialize};

/// Third-party identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
    Twitter,
}

impl Provider {
    /// Lowercase label for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
            Provider::Twitter => "twitter",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Local user account as held by the credential store.
///
/// `username` is the unique, immutable key; for accounts created through an
/// OAuth provider it holds the profile email (or display name for Twitter,
/// which exposes no stable email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub display_name: Option<String>,
    pub picture: Option<String>,
    /// Argon2id PHC string; present only for password accounts.
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub twitter_id: Option<String>,
    /// When the account was first created (RFC 3339).
    pub created_at: String,
}

impl UserRecord {
    /// Create an empty record for `username` with the creation time stamped.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: None,
            picture: None,
            password_hash: None,
            google_id: None,
            facebook_id: None,
            twitter_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The external id this record holds for `provider`, if any.
    pub fn provider_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google_id.as_deref(),
            Provider::Facebook => self.facebook_id.as_deref(),
            Provider::Twitter => self.twitter_id.as_deref(),
        }
    }
}

/// Partial update applied to an existing record.
///
/// `None` fields leave the stored value untouched; `Some` fields overwrite it.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub picture: Option<String>,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub twitter_id: Option<String>,
}

impl UserPatch {
    /// Patch that sets the external id for `provider`.
    pub fn with_provider_id(mut self, provider: Provider, external_id: impl Into<String>) -> Self {
        let id = Some(external_id.into());
        match provider {
            Provider::Google => self.google_id = id,
            Provider::Facebook => self.facebook_id = id,
            Provider::Twitter => self.twitter_id = id,
        }
        self
    }

    /// Merge this patch into `record`, field by field.
    pub fn apply(self, record: &mut UserRecord) {
        if let Some(v) = self.display_name {
            record.display_name = Some(v);
        }
        if let Some(v) = self.picture {
            record.picture = Some(v);
        }
        if let Some(v) = self.password_hash {
            record.password_hash = Some(v);
        }
        if let Some(v) = self.google_id {
            record.google_id = Some(v);
        }
        if let Some(v) = self.facebook_id {
            record.facebook_id = Some(v);
        }
        if let Some(v) = self.twitter_id {
            record.twitter_id = Some(v);
        }
    }
}
