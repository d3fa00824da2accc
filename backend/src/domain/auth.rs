//! Authentication and account payload primitives.
//!
//! Handlers hand raw strings to these constructors so the account service
//! only ever sees validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{AgeGroup, DisplayName, EmailAddress, Gender, Language, UserValidationError};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum password length in characters.
pub const PASSWORD_MAX: usize = 128;

/// Validation failures for account payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// A user attribute failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// A password field was shorter than [`PASSWORD_MIN`].
    #[error("{field} must be at least {min} characters")]
    PasswordTooShort {
        /// Offending request field.
        field: &'static str,
        /// Minimum accepted length.
        min: usize,
    },
    /// A password field was longer than [`PASSWORD_MAX`].
    #[error("{field} must be at most {max} characters")]
    PasswordTooLong {
        /// Offending request field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// `password` and `confirm_password` differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl AccountValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::User(err) => err.field(),
            Self::PasswordTooShort { field, .. } | Self::PasswordTooLong { field, .. } => *field,
            Self::PasswordMismatch => "confirm_password",
        }
    }

    /// Machine-readable validation code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::User(err) => err.code(),
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordTooLong { .. } => "too_long",
            Self::PasswordMismatch => "mismatch",
        }
    }
}

/// Plain-text password held only as long as needed and wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a password supplied in `field`.
    pub fn new(raw: &str, field: &'static str) -> Result<Self, AccountValidationError> {
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(AccountValidationError::PasswordTooShort {
                field,
                min: PASSWORD_MIN,
            });
        }
        if length > PASSWORD_MAX {
            return Err(AccountValidationError::PasswordTooLong {
                field,
                max: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// The plain text. Do not log it.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use account_service::domain::Registration;
///
/// let registration =
///     Registration::try_from_parts("Ann", "Ann@x.com", "secret1", "secret1").expect("valid");
/// assert_eq!(registration.email().as_ref(), "ann@x.com");
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Password,
}

impl Registration {
    /// Validate field shapes first, then check that both passwords match.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, AccountValidationError> {
        let display_name = DisplayName::new(name)?;
        let address = EmailAddress::parse(email)?;
        let secret = Password::new(password, "password")?;
        let confirm = Password::new(confirm_password, "confirm_password")?;
        if secret != confirm {
            return Err(AccountValidationError::PasswordMismatch);
        }
        Ok(Self {
            name: display_name,
            email: address,
            password: secret,
        })
    }

    /// Display name to store.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email to store.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password to hash.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated login credentials.
///
/// The password is not length-checked: any mismatch surfaces as the same
/// authentication failure.
#[derive(Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        let address = EmailAddress::parse(email)?;
        Ok(Self {
            email: address,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the lookup.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw partial update as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileUpdateParts<'a> {
    /// New display name.
    pub name: Option<&'a str>,
    /// New password.
    pub new_password: Option<&'a str>,
    /// New age group label.
    pub age_group: Option<&'a str>,
    /// New gender label.
    pub gender: Option<&'a str>,
    /// New language label.
    pub language: Option<&'a str>,
}

/// Validated partial profile update. `None` leaves a value unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Replacement display name.
    pub name: Option<DisplayName>,
    /// Replacement password, hashed before storage.
    pub new_password: Option<Password>,
    /// Replacement age group.
    pub age_group: Option<AgeGroup>,
    /// Replacement gender.
    pub gender: Option<Gender>,
    /// Replacement language.
    pub language: Option<Language>,
}

/// Blank and whitespace-only strings count as "not provided".
fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl ProfileUpdate {
    /// Validate each provided field.
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::{ProfileUpdate, ProfileUpdateParts};
    ///
    /// let update = ProfileUpdate::try_from_parts(ProfileUpdateParts {
    ///     name: Some("  "),
    ///     language: Some("French"),
    ///     ..ProfileUpdateParts::default()
    /// })
    /// .expect("valid update");
    /// assert!(update.name.is_none());
    /// assert!(update.language.is_some());
    /// ```
    pub fn try_from_parts(parts: ProfileUpdateParts<'_>) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: provided(parts.name).map(DisplayName::new).transpose()?,
            new_password: provided(parts.new_password)
                .map(|raw| Password::new(raw, "new_password"))
                .transpose()?,
            age_group: provided(parts.age_group).map(str::parse).transpose()?,
            gender: provided(parts.gender).map(str::parse).transpose()?,
            language: provided(parts.language).map(str::parse).transpose()?,
        })
    }

    /// Whether nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.new_password.is_none()
            && self.age_group.is_none()
            && self.gender.is_none()
            && self.language.is_none()
    }
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
