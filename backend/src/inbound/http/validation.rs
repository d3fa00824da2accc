//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{AccountValidationError, Error};

/// Convert a payload validation failure into a `400 invalid_request` error
/// whose details name the offending field.
pub(crate) fn validation_error(err: &AccountValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}
