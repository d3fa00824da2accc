//! Bearer token extraction for authenticated handlers.
//!
//! The extractor only pulls the raw credential out of the `Authorization`
//! header. Verifying it is the domain's job, so handlers pass the token
//! straight to the profile ports.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::Error;

/// Message returned when no usable bearer credential is present.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Not authenticated";

const BEARER_SCHEME: &str = "bearer";

/// Raw bearer token taken from `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Borrow the encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_header(value: &str) -> Option<Self> {
        let (scheme, rest) = value.trim().split_once(' ')?;
        let token = rest.trim();
        (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty())
            .then(|| Self(token.to_owned()))
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::from_header);

        ready(token.ok_or_else(|| {
            warn!(path = req.path(), "request without bearer credentials");
            Error::unauthorized(NOT_AUTHENTICATED_MESSAGE)
        }))
    }
}
