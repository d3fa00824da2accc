//! Driving port for partial profile updates.
use async_trait::async_trait;

use crate::domain::{Error, Profile, ProfileUpdate};

/// Applies partial updates to the caller's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Verify `token`, apply `update` and return the resulting profile.
    ///
    /// An empty update performs no write.
    async fn update_profile(&self, token: &str, update: ProfileUpdate) -> Result<Profile, Error>;
}
