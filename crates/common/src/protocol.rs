//! Request and response bodies exchanged over the public HTTP API.
//!
//! All types are serialised as JSON. Request types that carry a password
//! implement [`Debug`] by hand so the password never reaches a log line.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Greeting
// ---------------------------------------------------------------------------

/// Body carrying a single human-readable message.
///
/// Used by `GET /api` and by `POST /api/analyze` when no food is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Encrypt / decrypt
// ---------------------------------------------------------------------------

/// Request body for `POST /api/encrypt`.
#[derive(Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Plaintext to protect.
    pub text: String,
    /// Password the encryption key is derived from. May be empty.
    pub password: String,
}

impl fmt::Debug for EncryptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptRequest")
            .field("text_len", &self.text.len())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful response body for `POST /api/encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// URL-safe base64 of `salt ‖ nonce ‖ ciphertext ‖ tag`.
    pub encrypted_text: String,
}

/// Request body for `POST /api/decrypt`.
#[derive(Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    pub encrypted_text: String,
    pub password: String,
}

impl fmt::Debug for DecryptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptRequest")
            .field("encrypted_text_len", &self.encrypted_text.len())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful response body for `POST /api/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub decrypted_text: String,
}

// ---------------------------------------------------------------------------
// Food analysis
// ---------------------------------------------------------------------------

/// Nutritional summary of the first food item recognised in an image.
///
/// Values are passed through from the provider unchanged, so they may be
/// strings, numbers, or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub food_name: Option<serde_json::Value>,
    pub calories: Option<serde_json::Value>,
    pub protein: Option<serde_json::Value>,
    pub fat: Option<serde_json::Value>,
    pub carbs: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub detail: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and detail message.
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}
