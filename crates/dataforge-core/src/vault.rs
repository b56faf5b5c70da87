//! Credential vault: symmetric encryption for administrative passwords.
//!
//! Instance passwords are stored only in encrypted form. The vault derives a
//! 256-bit key from a configured secret (SHA-256), encrypts with AES-256-GCM
//! under a fresh random nonce, and emits base64(nonce ‖ ciphertext). Pure
//! string-to-string, no I/O.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dataforge_commons::DataForgeError;
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed: {0}")]
    Decrypt(String),

    #[error("ciphertext is not valid base64: {0}")]
    Encoding(String),
}

impl From<VaultError> for DataForgeError {
    fn from(err: VaultError) -> Self {
        DataForgeError::RuntimeFailure(err.to_string())
    }
}

/// Symmetric encrypt/decrypt capability for stored credentials.
pub struct CredentialVault {
    cipher: Aes256Gcm,
}

impl CredentialVault {
    /// Derive the vault key from a configured secret string.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::Encrypt)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(payload))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, VaultError> {
        let payload = BASE64
            .decode(encoded)
            .map_err(|e| VaultError::Encoding(e.to_string()))?;
        if payload.len() <= NONCE_LEN {
            return Err(VaultError::Decrypt("payload too short".into()));
        }
        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::Decrypt("authentication failed".into()))?;
        String::from_utf8(plaintext).map_err(|e| VaultError::Decrypt(e.to_string()))
    }
}
