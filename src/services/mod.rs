// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External provider clients and identity resolution.

pub mod facebook;
pub mod google;
pub mod linker;
pub mod oauth;
pub mod twitter;

pub use facebook::FacebookClient;
pub use google::GoogleClient;
pub use oauth::ProviderProfile;
pub use twitter::TwitterClient;
