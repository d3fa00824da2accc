//! User data model.
//!
//! The stored [`User`] carries the password digest; everything leaving the
//! service goes through the [`Profile`] projection instead.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors raised while building user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The name was blank after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// The name exceeded [`NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The email was blank after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email did not look like `local@domain.tld`.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// The email exceeded [`EMAIL_MAX`] characters.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The age group is not one of the fixed labels.
    #[error("age_group must be one of: {}", AgeGroup::labels().join(", "))]
    UnknownAgeGroup,
    /// The gender is not one of the fixed labels.
    #[error("gender must be one of: {}", Gender::labels().join(", "))]
    UnknownGender,
    /// The language is not one of the fixed labels.
    #[error("language must be one of: {}", Language::labels().join(", "))]
    UnknownLanguage,
}

impl UserValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::UnknownAgeGroup => "age_group",
            Self::UnknownGender => "gender",
            Self::UnknownLanguage => "language",
        }
    }

    /// Machine-readable validation code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyEmail => "empty",
            Self::NameTooLong { .. } | Self::EmailTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_format",
            Self::UnknownAgeGroup | Self::UnknownGender | Self::UnknownLanguage => {
                "unknown_value"
            }
        }
    }
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = i64, example = 1)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier produced by the store.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum display name length in characters.
pub const NAME_MAX: usize = 100;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;

/// Display name, trimmed and between 1 and [`NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::DisplayName;
    ///
    /// let name = DisplayName::new("  Ann ").expect("valid name");
    /// assert_eq!(name.as_ref(), "Ann");
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address: trimmed, lowercased and shape-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::EmailAddress;
    ///
    /// let email = EmailAddress::parse(" Ann@X.com").expect("valid email");
    /// assert_eq!(email.as_ref(), "ann@x.com");
    /// ```
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Salted one-way password digest in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest produced by a password hasher or loaded from the store.
    #[must_use]
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Defines a closed set of labelled choices with serde and parsing support.
macro_rules! labelled_choice {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every choice in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable label, identical to the wire value.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Every label in display order.
            #[must_use]
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|choice| choice.label()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UserValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.label() == trimmed)
                    .ok_or(UserValidationError::$error)
            }
        }
    };
}

labelled_choice! {
    /// Self-reported age bracket.
    AgeGroup, UnknownAgeGroup {
        /// Younger than eighteen.
        Under18 => "Under 18",
        /// Eighteen to twenty-four.
        From18To24 => "18-24",
        /// Twenty-five to thirty-four.
        From25To34 => "25-34",
        /// Thirty-five to forty-four.
        From35To44 => "35-44",
        /// Forty-five to fifty-four.
        From45To54 => "45-54",
        /// Fifty-five or older.
        Over55 => "55+",
    }
}

labelled_choice! {
    /// Self-reported gender.
    Gender, UnknownGender {
        /// Male.
        Male => "Male",
        /// Female.
        Female => "Female",
        /// Any other gender.
        Other => "Other",
        /// Declined to answer.
        PreferNotToSay => "Prefer not to say",
    }
}

labelled_choice! {
    /// Preferred language.
    Language, UnknownLanguage {
        /// English.
        English => "English",
        /// Spanish.
        Spanish => "Spanish",
        /// French.
        French => "French",
        /// German.
        German => "German",
        /// Chinese.
        Chinese => "Chinese",
        /// Hindi.
        Hindi => "Hindi",
        /// Any other language.
        Other => "Other",
    }
}

/// Optional demographic attributes attached to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Demographics {
    /// Age bracket.
    pub age_group: Option<AgeGroup>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Preferred language.
    pub language: Option<Language>,
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    password_digest: PasswordDigest,
    demographics: Demographics,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub const fn new(
        id: UserId,
        name: DisplayName,
        email: EmailAddress,
        password_digest: PasswordDigest,
        demographics: Demographics,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_digest,
            demographics,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password digest.
    #[must_use]
    pub const fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }

    /// Optional demographic attributes.
    #[must_use]
    pub const fn demographics(&self) -> Demographics {
        self.demographics
    }

    /// Replace the display name.
    pub fn set_name(&mut self, name: DisplayName) {
        self.name = name;
    }

    /// Replace the password digest.
    pub fn set_password_digest(&mut self, digest: PasswordDigest) {
        self.password_digest = digest;
    }

    /// Mutable access to the demographic attributes.
    pub const fn demographics_mut(&mut self) -> &mut Demographics {
        &mut self.demographics
    }
}

/// A user that has not been stored yet and therefore has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: DisplayName,
    /// Normalised email.
    pub email: EmailAddress,
    /// Salted password digest.
    pub password_digest: PasswordDigest,
}

impl NewUser {
    /// Attach the identifier assigned by the store.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User::new(
            id,
            self.name,
            self.email,
            self.password_digest,
            Demographics::default(),
        )
    }
}

/// Public projection of a user. It has no digest field.
///
/// # Examples
/// ```
/// use account_service::domain::{
///     Demographics, DisplayName, EmailAddress, PasswordDigest, Profile, User, UserId,
/// };
///
/// let user = User::new(
///     UserId::new(1),
///     DisplayName::new("Ann").expect("name"),
///     EmailAddress::parse("ann@x.com").expect("email"),
///     PasswordDigest::new("$argon2id$..."),
///     Demographics::default(),
/// );
/// let profile = Profile::from(&user);
/// assert_eq!(profile.email, "ann@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    /// Store-assigned identifier.
    #[schema(value_type = i64, example = 1)]
    pub id: UserId,
    /// Display name.
    #[schema(example = "Ann")]
    pub name: String,
    /// Normalised email.
    #[schema(example = "ann@x.com")]
    pub email: String,
    /// Age bracket, if provided.
    pub age_group: Option<AgeGroup>,
    /// Gender, if provided.
    pub gender: Option<Gender>,
    /// Preferred language, if provided.
    pub language: Option<Language>,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        let Demographics {
            age_group,
            gender,
            language,
        } = user.demographics();
        Self {
            id: user.id(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            age_group,
            gender,
            language,
        }
    }
}
