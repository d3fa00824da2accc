//! Driving port for account registration.
use async_trait::async_trait;

use crate::domain::{Error, Profile, Registration};

/// Creates accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Store a new user and return its profile.
    async fn register(&self, registration: Registration) -> Result<Profile, Error>;
}
