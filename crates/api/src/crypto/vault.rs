//! PBKDF2-HMAC-SHA256 key derivation and AES-256-GCM-SIV sealing of text.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) with a fresh random nonce
//! per call. A wrong password and a tampered payload both surface as a failed
//! tag check, and callers must not be able to tell the two apart.

use aes_gcm_siv::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256GcmSiv, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of the random salt prefixed to every payload.
pub const SALT_LEN: usize = 16;

/// Byte length of a derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the AES-GCM-SIV authentication tag.
pub const TAG_LEN: usize = 16;

/// PBKDF2 iteration count.
///
/// Not recorded in the payload; raising it breaks every existing payload.
pub const KDF_ROUNDS: u32 = 100_000;

/// Errors produced by the vault.
///
/// None of the messages carry key, salt, password or plaintext material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    /// The AEAD refused to seal the plaintext (only possible past its length limit).
    #[error("aead seal failed")]
    Seal,

    /// The payload is not valid URL-safe base64.
    #[error("payload is not valid base64url")]
    Decode,

    /// The decoded payload is too short to hold a salt.
    #[error("payload shorter than {SALT_LEN}-byte salt")]
    Format,

    /// The authentication tag did not verify: wrong password or tampered payload.
    #[error("authentication failed")]
    Authentication,

    /// The decrypted bytes are not valid UTF-8.
    #[error("plaintext is not valid utf-8")]
    Encoding,
}

/// A 256-bit key derived from a password and salt.
///
/// The bytes are zeroed when the key is dropped and never printed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Raw key bytes.
    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    fn cipher(&self) -> Aes256GcmSiv {
        Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(&self.0))
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a [`KEY_LEN`]-byte key from `password` and `salt`.
///
/// Deterministic and total: any password, including the empty string, is
/// accepted.
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
    pbkdf2_sha256(password.as_bytes(), salt, KDF_ROUNDS)
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], rounds: u32) -> DerivedKey {
    let mut key = DerivedKey([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut key.0);
    key
}

/// Encrypt `plaintext` under a key derived from `password`.
///
/// A fresh salt and nonce are drawn from the OS CSPRNG on every call, so two
/// encryptions of the same text with the same password never produce the
/// same payload.
///
/// # Errors
///
/// Returns [`VaultError::Seal`] only if the plaintext exceeds the AEAD's
/// length limit (about 64 GiB).
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, VaultError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    seal(plaintext.as_bytes(), password, &salt, &nonce)
}

/// Build a payload from caller-supplied salt and nonce.
fn seal(
    plaintext: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<String, VaultError> {
    let key = derive_key(password, salt);
    let sealed = key
        .cipher()
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| VaultError::Seal)?;

    let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
    payload.extend_from_slice(salt);
    payload.extend_from_slice(nonce);
    payload.extend_from_slice(&sealed);

    Ok(URL_SAFE.encode(payload))
}

/// Decrypt a payload produced by [`encrypt`].
///
/// # Errors
///
/// - [`VaultError::Decode`] if `encoded` is not padded URL-safe base64.
/// - [`VaultError::Format`] if the decoded bytes are shorter than the salt.
/// - [`VaultError::Authentication`] if the tag does not verify, including
///   envelopes too short to hold a nonce and tag.
/// - [`VaultError::Encoding`] if the recovered plaintext is not UTF-8.
pub fn decrypt(encoded: &str, password: &str) -> Result<String, VaultError> {
    let raw = URL_SAFE.decode(encoded).map_err(|_| VaultError::Decode)?;
    if raw.len() < SALT_LEN {
        return Err(VaultError::Format);
    }

    let (salt, envelope) = raw.split_at(SALT_LEN);
    let salt: &[u8; SALT_LEN] = salt.try_into().map_err(|_| VaultError::Format)?;

    let key = derive_key(password, salt);
    let plaintext = open(&key, envelope)?;

    String::from_utf8(plaintext).map_err(|_| VaultError::Encoding)
}

/// Verify and decrypt `nonce ‖ ciphertext ‖ tag`.
fn open(key: &DerivedKey, envelope: &[u8]) -> Result<Vec<u8>, VaultError> {
    if envelope.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::Authentication);
    }
    let (nonce, sealed) = envelope.split_at(NONCE_LEN);
    key.cipher()
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| VaultError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [0x11; SALT_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x22; NONCE_LEN];

    fn decode(payload: &str) -> Vec<u8> {
        URL_SAFE.decode(payload).unwrap()
    }

    #[test]
    fn secret_message_round_trip() {
        let payload = encrypt("This is a secret message.", "testpassword").unwrap();
        assert_ne!(payload, "This is a secret message.");
        assert_eq!(
            decrypt(&payload, "testpassword").unwrap(),
            "This is a secret message."
        );
    }

    #[test]
    fn wrong_password_is_rejected() {
        let payload = encrypt("This is a secret message.", "testpassword").unwrap();
        assert_eq!(
            decrypt(&payload, "wrongpassword"),
            Err(VaultError::Authentication)
        );
    }

    #[test]
    fn empty_text_and_password() {
        let payload = encrypt("", "").unwrap();
        assert_eq!(decode(&payload).len(), SALT_LEN + NONCE_LEN + TAG_LEN);
        assert_eq!(decrypt(&payload, "").unwrap(), "");
    }

    #[test]
    fn multibyte_text_round_trip() {
        let text = "naïve café ☕ 寿司 🍣";
        let payload = encrypt(text, "pässwörd").unwrap();
        assert_eq!(decrypt(&payload, "pässwörd").unwrap(), text);
    }

    #[test]
    fn salt_is_fresh_per_call() {
        let a = encrypt("same text", "same password").unwrap();
        let b = encrypt("same text", "same password").unwrap();
        assert_ne!(a, b);
        assert_ne!(decode(&a)[..SALT_LEN], decode(&b)[..SALT_LEN]);
    }

    #[test]
    fn payload_layout_is_salt_nonce_sealed() {
        let payload = seal(b"hello", "pw", &SALT, &NONCE).unwrap();
        let raw = decode(&payload);
        assert_eq!(&raw[..SALT_LEN], &SALT);
        assert_eq!(&raw[SALT_LEN..SALT_LEN + NONCE_LEN], &NONCE);
        assert_eq!(raw.len(), SALT_LEN + NONCE_LEN + b"hello".len() + TAG_LEN);
        assert_eq!(decrypt(&payload, "pw").unwrap(), "hello");
    }

    #[test]
    fn seal_is_deterministic_for_fixed_salt_and_nonce() {
        let a = seal(b"hello", "pw", &SALT, &NONCE).unwrap();
        let b = seal(b"hello", "pw", &SALT, &NONCE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn payload_uses_url_safe_alphabet_with_padding() {
        // 16 + 12 + 3 + 16 = 47 bytes, which needs one padding character.
        let payload = seal(&[0xfb, 0xff, 0xfe], "pw", &[0xff; SALT_LEN], &NONCE).unwrap();
        assert!(!payload.contains('+'));
        assert!(!payload.contains('/'));
        assert!(payload.ends_with('='));
    }

    #[test]
    fn flipping_any_envelope_byte_fails_auth() {
        let payload = encrypt("x", "pw").unwrap();
        let raw = decode(&payload);
        for i in SALT_LEN..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            let tampered = URL_SAFE.encode(&tampered);
            assert_eq!(
                decrypt(&tampered, "pw"),
                Err(VaultError::Authentication),
                "byte {i} was not covered by the tag"
            );
        }
    }

    #[test]
    fn flipping_salt_byte_fails_auth() {
        let payload = encrypt("x", "pw").unwrap();
        let mut raw = decode(&payload);
        raw[0] ^= 0x80;
        assert_eq!(
            decrypt(&URL_SAFE.encode(&raw), "pw"),
            Err(VaultError::Authentication)
        );
    }

    #[test]
    fn malformed_base64_is_decode_error() {
        assert_eq!(decrypt("not-base64!!", "any"), Err(VaultError::Decode));
        assert_eq!(
            decrypt("this is not encrypted text", "any"),
            Err(VaultError::Decode)
        );
    }

    #[test]
    fn standard_alphabet_is_rejected() {
        // '+' and '/' belong to the standard alphabet only.
        assert_eq!(decrypt("ab+/", "any"), Err(VaultError::Decode));
    }

    #[test]
    fn short_payload_is_format_error() {
        let short = URL_SAFE.encode(b"short");
        assert_eq!(decrypt(&short, "any"), Err(VaultError::Format));
        assert_eq!(decrypt("", "any"), Err(VaultError::Format));
    }

    #[test]
    fn salt_without_envelope_fails_auth() {
        let only_salt = URL_SAFE.encode(SALT);
        assert_eq!(decrypt(&only_salt, "any"), Err(VaultError::Authentication));

        let mut truncated = SALT.to_vec();
        truncated.extend_from_slice(&NONCE);
        assert_eq!(
            decrypt(&URL_SAFE.encode(&truncated), "any"),
            Err(VaultError::Authentication)
        );
    }

    #[test]
    fn truncated_tag_fails_auth() {
        let payload = encrypt("truncate me", "pw").unwrap();
        let mut raw = decode(&payload);
        raw.pop();
        assert_eq!(
            decrypt(&URL_SAFE.encode(&raw), "pw"),
            Err(VaultError::Authentication)
        );
    }

    #[test]
    fn non_utf8_plaintext_is_encoding_error() {
        let payload = seal(&[0xff, 0xfe, 0xfd], "pw", &SALT, &NONCE).unwrap();
        assert_eq!(decrypt(&payload, "pw"), Err(VaultError::Encoding));
    }

    #[test]
    fn derive_key_is_deterministic_and_salt_sensitive() {
        let a = derive_key("pw", &SALT);
        let b = derive_key("pw", &SALT);
        let c = derive_key("pw", &[0x12; SALT_LEN]);
        let d = derive_key("pw2", &SALT);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
        assert_ne!(a.as_bytes(), d.as_bytes());
    }

    #[test]
    fn pbkdf2_sha256_known_answer() {
        // RFC 7914 §11, PBKDF2-HMAC-SHA256("passwd", "salt", c = 1), first 32 bytes.
        let expected: [u8; KEY_LEN] = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57,
            0xc2, 0x0d, 0xac, 0xbc,
        ];
        let key = pbkdf2_sha256(b"passwd", b"salt", 1);
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn derived_key_redacted_in_debug() {
        let key = derive_key("pw", &SALT);
        assert_eq!(format!("{key:?}"), "DerivedKey([REDACTED])");
    }

    #[test]
    fn error_messages_do_not_leak_inputs() {
        let payload = encrypt("top secret", "hunter2").unwrap();
        let err = decrypt(&payload, "wrong").unwrap_err();
        let msg = err.to_string();
        assert!(!msg.contains("hunter2"));
        assert!(!msg.contains("top secret"));
        assert!(!msg.contains(&payload));
    }
}
