//! Driving port for login.
//!
//! Inbound adapters call it to exchange credentials for a bearer token
//! without knowing how users are stored or tokens are signed.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials};

/// Message shared by every failed login so callers cannot enumerate registered emails.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and mint a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}
