//! Remote account operations.
//!
//! [`AccountApi`] is the seam the views depend on; [`HttpAccountApi`] talks
//! to the account service over HTTP with a fixed per-request timeout.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::settings::ClientSettings;

/// Failures surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The service answered with an error status.
    #[error("{detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// `detail` from the error body, or a fallback.
        detail: String,
    },
    /// The request never got an answer: timeout, refused connection, DNS.
    #[error("Request failed: {message}")]
    Transport {
        /// Underlying transport error.
        message: String,
    },
    /// The service answered successfully but the body was unexpected.
    #[error("Unexpected response: {message}")]
    Decode {
        /// Why the body could not be read.
        message: String,
    },
}

impl ClientError {
    fn transport(err: &reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    fn decode(err: &reqwest::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

/// Public profile as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Lowercased email.
    pub email: String,
    /// Age group label, if set.
    pub age_group: Option<String>,
    /// Gender label, if set.
    pub gender: Option<String>,
    /// Language label, if set.
    pub language: Option<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeat of `password`.
    pub confirm_password: String,
}

/// Body of `PUT /me`. Only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileChanges {
    /// Replacement display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    /// Age group label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// Gender label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Language label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
}

/// Operations offered by the account service.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Create an account.
    async fn register(&self, registration: &Registration) -> Result<Profile, ClientError>;

    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String, ClientError>;

    /// Fetch the profile owned by `token`.
    async fn me(&self, token: &str) -> Result<Profile, ClientError>;

    /// Apply `changes` to the profile owned by `token`.
    async fn update_me(
        &self,
        token: &str,
        changes: &ProfileChanges,
    ) -> Result<Profile, ClientError>;
}

/// HTTP implementation of [`AccountApi`].
#[derive(Debug, Clone)]
pub struct HttpAccountApi {
    client: Client,
    base: String,
}

impl HttpAccountApi {
    /// Build a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the HTTP client cannot be
    /// initialised.
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|err| ClientError::transport(&err))?;
        Ok(Self {
            client,
            base: settings.base().to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "request failed");
            ClientError::transport(&err)
        })?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response received");

        if status.is_success() {
            return response.json::<T>().await.map_err(|err| ClientError::decode(&err));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ClientError::transport(&err))?;
        Err(ClientError::Rejected {
            status: status.as_u16(),
            detail: rejection_detail(status, &body),
        })
    }
}

/// Human-readable reason for a failed request: the `detail` field of a JSON
/// body, else the raw body, else the status reason.
fn rejection_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None if !body.trim().is_empty() => body.trim().to_owned(),
        None => status
            .canonical_reason()
            .unwrap_or("Request rejected")
            .to_owned(),
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn register(&self, registration: &Registration) -> Result<Profile, ClientError> {
        self.send(self.client.post(self.url("/register")).json(registration))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let body: TokenBody = self
            .send(
                self.client
                    .post(self.url("/login"))
                    .json(&LoginBody { email, password }),
            )
            .await?;
        Ok(body.access_token)
    }

    async fn me(&self, token: &str) -> Result<Profile, ClientError> {
        self.send(self.client.get(self.url("/me")).bearer_auth(token))
            .await
    }

    async fn update_me(
        &self,
        token: &str,
        changes: &ProfileChanges,
    ) -> Result<Profile, ClientError> {
        self.send(
            self.client
                .put(self.url("/me"))
                .bearer_auth(token)
                .json(changes),
        )
        .await
    }
}
