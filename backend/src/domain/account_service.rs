//! Account domain service.
//!
//! Implements the registration, login and profile driving ports over the
//! user repository, password hasher and token service driven ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    INVALID_CREDENTIALS_MESSAGE, INVALID_TOKEN_MESSAGE, LoginService, PasswordHashError,
    PasswordHasher, ProfileCommand, ProfileQuery, RegistrationCommand, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessToken, Error, LoginCredentials, NewUser, Profile, ProfileUpdate, Registration, User,
};

/// Message returned when registering an email that is already taken.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered";

/// Message returned when the user store cannot be reached.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service unavailable";

/// Account service implementing every account driving port.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    /// Create a service over the given driven ports.
    #[must_use]
    pub const fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Store details stay in the logs; callers only see a generic message.
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                warn!(%message, "user repository unavailable");
                Error::service_unavailable(SERVICE_UNAVAILABLE_MESSAGE)
            }
            UserPersistenceError::Query { message } => {
                error!(%message, "user repository query failed");
                Error::internal("Internal server error")
            }
            UserPersistenceError::DuplicateEmail { .. } => Self::duplicate_email(),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        match error {
            PasswordHashError::Hash { message } => {
                Error::internal(format!("password hashing failed: {message}"))
            }
            PasswordHashError::MalformedDigest { message } => {
                Error::internal(format!("stored password digest is malformed: {message}"))
            }
        }
    }

    fn duplicate_email() -> Error {
        Error::conflict(DUPLICATE_EMAIL_MESSAGE).with_details(json!({
            "field": "email",
            "code": "duplicate",
        }))
    }

    fn invalid_token() -> Error {
        Error::unauthorized(INVALID_TOKEN_MESSAGE)
    }

    /// Resolve a bearer token to the stored user it names.
    async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let subject = self.tokens.verify(token).map_err(|err| {
            match &err {
                TokenError::Expired => warn!("rejected expired token"),
                _ => warn!(error = %err, "rejected token"),
            }
            Self::invalid_token()
        })?;

        let user = self
            .users
            .find_by_email(&subject)
            .await
            .map_err(Self::map_persistence_error)?;

        user.ok_or_else(|| {
            warn!("token subject no longer resolves to a user");
            Self::invalid_token()
        })
    }
}

#[async_trait]
impl RegistrationCommand for AccountService {
    async fn register(&self, registration: Registration) -> Result<Profile, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(Self::map_persistence_error)?;
        if existing.is_some() {
            return Err(Self::duplicate_email());
        }

        let password_digest = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hash_error)?;

        let user = self
            .users
            .insert(NewUser {
                name: registration.name().clone(),
                email: registration.email().clone(),
                password_digest,
            })
            .await
            .map_err(Self::map_persistence_error)?;

        info!(user_id = %user.id(), "registered user");
        Ok(Profile::from(&user))
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let found = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_persistence_error)?;

        let Some(user) = found else {
            self.hasher.verify_dummy(credentials.password()).await;
            warn!("login failed for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), user.password_digest())
            .await
            .map_err(Self::map_hash_error)?;
        if !verified {
            warn!(user_id = %user.id(), "login failed with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        let token = self
            .tokens
            .issue(user.email())
            .map_err(|err| Error::internal(err.to_string()))?;
        info!(user_id = %user.id(), "user logged in");
        Ok(token)
    }
}

#[async_trait]
impl ProfileQuery for AccountService {
    async fn fetch_profile(&self, token: &str) -> Result<Profile, Error> {
        let user = self.authenticate(token).await?;
        Ok(Profile::from(&user))
    }
}

#[async_trait]
impl ProfileCommand for AccountService {
    async fn update_profile(&self, token: &str, update: ProfileUpdate) -> Result<Profile, Error> {
        let mut user = self.authenticate(token).await?;
        if update.is_empty() {
            return Ok(Profile::from(&user));
        }

        let ProfileUpdate {
            name,
            new_password,
            age_group,
            gender,
            language,
        } = update;

        if let Some(display_name) = name {
            user.set_name(display_name);
        }
        if let Some(password) = new_password {
            let digest = self
                .hasher
                .hash(&password)
                .await
                .map_err(Self::map_hash_error)?;
            user.set_password_digest(digest);
        }
        let demographics = user.demographics_mut();
        if age_group.is_some() {
            demographics.age_group = age_group;
        }
        if gender.is_some() {
            demographics.gender = gender;
        }
        if language.is_some() {
            demographics.language = language;
        }

        self.users
            .update(&user)
            .await
            .map_err(Self::map_persistence_error)?;

        info!(user_id = %user.id(), "updated profile");
        Ok(Profile::from(&user))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
