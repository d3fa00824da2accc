//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`RegistrationCommand`, `LoginService`, `ProfileQuery`,
//! `ProfileCommand`) are called by inbound adapters. Driven ports
//! (`UserRepository`, `PasswordHasher`, `TokenService`) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod profile_command;
mod profile_query;
mod registration_command;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{INVALID_CREDENTIALS_MESSAGE, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{INVALID_TOKEN_MESSAGE, ProfileQuery};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
