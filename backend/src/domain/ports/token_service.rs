//! Driven port for minting and checking bearer tokens.
use crate::domain::{AccessToken, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed, badly signed or has an unusable subject.
        Invalid {
            /// Why verification failed.
            message: String,
        } => "token rejected: {message}",
        /// The token was valid once but has expired.
        Expired => "token expired",
        /// A token could not be signed.
        Signing {
            /// Reason reported by the signer.
            message: String,
        } => "token signing failed: {message}",
    }
}

/// Stateless signed tokens whose subject is the user's email.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Mint a token for `subject` valid for the configured lifetime.
    fn issue(&self, subject: &EmailAddress) -> Result<AccessToken, TokenError>;

    /// Check signature and expiry, returning the subject.
    fn verify(&self, token: &str) -> Result<EmailAddress, TokenError>;
}
