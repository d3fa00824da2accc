//! Domain primitives, ports and the account service.
//!
//! Purpose: define strongly typed account entities used by the HTTP and
//! persistence adapters. Types validate on construction, so anything past
//! this boundary can be trusted.
//!
//! Public surface:
//! - Error (alias to `error::DomainError`) / ErrorCode: transport-agnostic
//!   failure payload.
//! - User / Profile: stored record and its public projection.
//! - Registration / LoginCredentials / ProfileUpdate: validated inputs.
//! - AccountService: implementation of every driving port.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::{
    AccountService, DUPLICATE_EMAIL_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE,
};
pub use self::auth::{
    AccessToken, AccountValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Password,
    ProfileUpdate, ProfileUpdateParts, Registration,
};
pub use self::error::{DomainError as Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    AgeGroup, Demographics, DisplayName, EMAIL_MAX, EmailAddress, Gender, Language, NAME_MAX,
    NewUser, PasswordDigest, Profile, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use account_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Not authenticated"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
