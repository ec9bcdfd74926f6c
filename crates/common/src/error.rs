//! Service-level error taxonomy shared by every HTTP handler.

use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Fixed message returned for every decryption failure.
///
/// The caller never learns whether the payload was malformed, truncated,
/// tampered with, or simply paired with the wrong password.
pub const INVALID_CIPHERTEXT_OR_PASSWORD: &str = "Invalid encrypted text or password.";

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::InvalidCiphertext`] → 400
/// - [`ServiceError::UpstreamAuth`] → 500
/// - [`ServiceError::Upstream`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed, or the nutrition provider rejected the image.
    #[error("{0}")]
    BadRequest(String),

    /// Decryption failed for any reason.
    #[error("{INVALID_CIPHERTEXT_OR_PASSWORD}")]
    InvalidCiphertext,

    /// The OAuth token exchange with the nutrition provider failed.
    #[error("Could not authenticate with Fatsecret API: {0}")]
    UpstreamAuth(String),

    /// The nutrition provider could not be reached or answered with an error status.
    #[error("Failed to connect to Fatsecret API: {0}")]
    Upstream(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) | ServiceError::InvalidCiphertext => 400,
            ServiceError::UpstreamAuth(_)
            | ServiceError::Upstream(_)
            | ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::InvalidCiphertext => "invalid_ciphertext",
            ServiceError::UpstreamAuth(_) => "upstream_auth_failed",
            ServiceError::Upstream(_) => "upstream_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }

    /// Build the JSON body sent to the caller.
    ///
    /// Internal errors are reported with a generic message; the detail is
    /// meant for logs only.
    pub fn to_response(&self) -> ErrorResponse {
        let detail = match self {
            ServiceError::Internal(_) => "internal server error".to_owned(),
            other => other.to_string(),
        };
        ErrorResponse::new(self.code(), detail)
    }
}
