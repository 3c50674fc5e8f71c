//! Credential storage layer.

pub mod memory;

pub use memory::{CredentialStore, StoreError};
