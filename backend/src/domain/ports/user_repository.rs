//! Driven port for user persistence.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store could not be reached.
        Connection {
            /// Reason reported by the store.
            message: String,
        } => "user repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query {
            /// Reason reported by the store.
            message: String,
        } => "user repository query failed: {message}",
        /// Another user already owns the email.
        DuplicateEmail {
            /// The contested address.
            email: String,
        } => "email already registered: {email}",
    }
}

/// Storage for user records.
///
/// Implementations must keep emails unique even under concurrent inserts and
/// report the loser of a race as [`UserPersistenceError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned identifier.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Look a user up by normalised email.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, UserPersistenceError>;

    /// Persist the mutable fields of an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;
}
