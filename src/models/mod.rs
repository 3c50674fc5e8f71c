//! Data models.

pub mod user;

pub use user::{Provider, UserPatch, UserRecord};
