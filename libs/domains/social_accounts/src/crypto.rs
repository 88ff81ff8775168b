//! AES-256-GCM encryption for stored platform credentials.
//!
//! Ciphertexts are stored as `base64(nonce):base64(ciphertext)` with a fresh
//! 96-bit nonce per value.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::Credentials;

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    pub fn new(key: &[u8; 32]) -> Self {
        let key: Key<Aes256Gcm> = (*key).into();
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Build from a 64-character hex key (`CREDENTIALS_ENCRYPTION_KEY`)
    pub fn from_hex(hex_key: &str) -> SocialAccountResult<Self> {
        let bytes = const_hex::decode(hex_key.trim())
            .map_err(|e| SocialAccountError::Crypto(format!("Invalid encryption key: {}", e)))?;

        let key: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            SocialAccountError::Crypto(format!(
                "Encryption key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self::new(&key))
    }

    /// Random key as 64 hex characters
    pub fn generate_key() -> String {
        const_hex::encode(rand::random::<[u8; 32]>())
    }

    pub fn encrypt(&self, plaintext: &str) -> SocialAccountResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| SocialAccountError::Crypto(format!("Failed to encrypt: {}", e)))?;

        Ok(format!("{}:{}", STANDARD.encode(nonce), STANDARD.encode(ciphertext)))
    }

    pub fn decrypt(&self, stored: &str) -> SocialAccountResult<String> {
        let (nonce_b64, data_b64) = stored
            .split_once(':')
            .ok_or_else(|| SocialAccountError::Crypto("Malformed ciphertext".to_string()))?;

        let nonce_bytes = STANDARD
            .decode(nonce_b64)
            .map_err(|e| SocialAccountError::Crypto(format!("Invalid nonce encoding: {}", e)))?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(SocialAccountError::Crypto(format!(
                "Nonce must be {} bytes, got {}",
                NONCE_LEN,
                nonce_bytes.len()
            )));
        }
        let ciphertext = STANDARD
            .decode(data_b64)
            .map_err(|e| SocialAccountError::Crypto(format!("Invalid ciphertext encoding: {}", e)))?;

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|e| SocialAccountError::Crypto(format!("Failed to decrypt: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| SocialAccountError::Crypto(format!("Decrypted data is not UTF-8: {}", e)))
    }

    pub fn encrypt_credentials(&self, credentials: &Credentials) -> SocialAccountResult<String> {
        let json = serde_json::to_string(credentials)
            .map_err(|e| SocialAccountError::Internal(format!("Failed to serialize credentials: {}", e)))?;
        self.encrypt(&json)
    }

    pub fn decrypt_credentials(&self, stored: &str) -> SocialAccountResult<Credentials> {
        let json = self.decrypt(stored)?;
        serde_json::from_str(&json)
            .map_err(|e| SocialAccountError::Crypto(format!("Invalid credentials payload: {}", e)))
    }
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialCipher")
    }
}
