use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// AES-GCM nonce length; prepended to every ciphertext.
const NONCE_LEN: usize = 12;

/// Why a stored field failed to decrypt.
#[derive(Debug, PartialEq, Eq)]
pub enum DecryptError {
    /// Not valid base64.
    Encoding,
    /// Shorter than the nonce frame.
    Truncated,
    /// Wrong key or tampered ciphertext.
    Authentication,
    /// Decrypted bytes were not UTF-8.
    Utf8,
}

/// Outcome of the read-time decode of a stored field.
///
/// `Raw` covers legacy plaintext rows as well as undecryptable input;
/// callers that only want the display value use [`FieldValue::into_inner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Decrypted(String),
    Raw(String),
}

impl FieldValue {
    pub fn into_inner(self) -> String {
        match self {
            FieldValue::Decrypted(s) | FieldValue::Raw(s) => s,
        }
    }

    pub fn is_decrypted(&self) -> bool {
        matches!(self, FieldValue::Decrypted(_))
    }
}

/// Symmetric cipher for post titles and contents.
///
/// The key is derived from the configured content secret; payloads
/// travel as base64(nonce || ciphertext).
#[derive(Clone)]
pub struct ContentCipher {
    key: Key<Aes256Gcm>,
}

impl ContentCipher {
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        let digest = hasher.finalize();

        let mut key = Key::<Aes256Gcm>::default();
        key.copy_from_slice(&digest);

        Self { key }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        let cipher = Aes256Gcm::new(&self.key);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AppError::InternalServerError(format!("Encryption failed: {}", e)))?;

        let mut combined = nonce.to_vec();
        combined.extend_from_slice(&ciphertext);

        Ok(general_purpose::STANDARD.encode(&combined))
    }

    /// Strict inverse of [`ContentCipher::encrypt`].
    pub fn decrypt(&self, stored: &str) -> Result<String, DecryptError> {
        let combined = general_purpose::STANDARD
            .decode(stored)
            .map_err(|_| DecryptError::Encoding)?;

        if combined.len() < NONCE_LEN {
            return Err(DecryptError::Truncated);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new(&self.key);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| DecryptError::Authentication)?;

        String::from_utf8(plaintext).map_err(|_| DecryptError::Utf8)
    }

    /// Total read-time decode: any decryption failure falls back to the
    /// stored value unchanged, so legacy plaintext rows keep working.
    pub fn decode_field(&self, stored: &str) -> FieldValue {
        match self.decrypt(stored) {
            Ok(plain) => FieldValue::Decrypted(plain),
            Err(_) => FieldValue::Raw(stored.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = ContentCipher::new("test_content_secret");
        let plaintext = "A confession about the CS221 final.";

        let encrypted = cipher.encrypt(plaintext).unwrap();
        assert_ne!(encrypted, plaintext);

        let decrypted = cipher.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn encrypt_produces_different_ciphertexts() {
        let cipher = ContentCipher::new("secret");

        let first = cipher.encrypt("same input").unwrap();
        let second = cipher.encrypt("same input").unwrap();

        // Random nonce per call.
        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), "same input");
        assert_eq!(cipher.decrypt(&second).unwrap(), "same input");
    }

    #[test]
    fn decrypt_with_wrong_key_fails() {
        let cipher = ContentCipher::new("correct_secret");
        let other = ContentCipher::new("wrong_secret");

        let encrypted = cipher.encrypt("secret message").unwrap();

        assert_eq!(
            other.decrypt(&encrypted).unwrap_err(),
            DecryptError::Authentication
        );
    }

    #[test]
    fn decrypt_rejects_invalid_base64() {
        let cipher = ContentCipher::new("secret");

        assert_eq!(
            cipher.decrypt("not base64!@#$").unwrap_err(),
            DecryptError::Encoding
        );
    }

    #[test]
    fn decrypt_rejects_truncated_input() {
        let cipher = ContentCipher::new("secret");
        let too_short = general_purpose::STANDARD.encode(b"short");

        assert_eq!(
            cipher.decrypt(&too_short).unwrap_err(),
            DecryptError::Truncated
        );
    }

    #[test]
    fn decode_field_inverts_encrypt() {
        let cipher = ContentCipher::new("secret");
        let encrypted = cipher.encrypt("hello forum").unwrap();

        let decoded = cipher.decode_field(&encrypted);
        assert!(decoded.is_decrypted());
        assert_eq!(decoded.into_inner(), "hello forum");
    }

    #[test]
    fn decode_field_passes_legacy_plaintext_through() {
        let cipher = ContentCipher::new("secret");

        let decoded = cipher.decode_field("plain legacy title");
        assert_eq!(
            decoded,
            FieldValue::Raw("plain legacy title".to_string())
        );
    }
}
