//! Driving port for reading the caller's profile.
use async_trait::async_trait;

use crate::domain::{Error, Profile};

/// Message returned when a bearer token cannot be trusted.
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

/// Resolves a bearer token to the owner's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Verify `token` and return the profile of its subject.
    async fn fetch_profile(&self, token: &str) -> Result<Profile, Error>;
}
