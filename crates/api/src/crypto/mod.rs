//! Password-based text encryption.
//!
//! This module is free of HTTP and provider dependencies. Both operations are
//! pure, stateless transforms and may be called concurrently from any thread.
//!
//! # Payload format
//!
//! ```text
//! base64url-padded( salt(16) ‖ nonce(12) ‖ ciphertext ‖ tag(16) )
//! ```
//!
//! The payload is not versioned: the KDF round count and AEAD algorithm are
//! fixed, and changing either makes existing payloads undecryptable.

pub mod vault;

pub use vault::{decrypt, encrypt, VaultError};
