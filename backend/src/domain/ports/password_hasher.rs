//! Driven port for one-way password hashing.
use async_trait::async_trait;

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Computing a digest failed.
        Hash {
            /// Reason reported by the hasher.
            message: String,
        } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest {
            /// Parser diagnostic.
            message: String,
        } => "stored password digest is malformed: {message}",
    }
}

/// Salted password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a fresh salted digest for `password`.
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `password` against a stored digest.
    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError>;

    /// Spend the same work as [`PasswordHasher::verify`] without a real
    /// digest, so unknown emails take as long as wrong passwords.
    async fn verify_dummy(&self, password: &str);
}
