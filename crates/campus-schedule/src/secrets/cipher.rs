use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use sha2::{Digest, Sha256};
use std::fmt;

/// Size of the AES-GCM nonce prepended to every ciphertext.
pub const NONCE_SIZE: usize = 12;

const TAG_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("secret key must not be empty")]
    EmptyKey,
    #[error("derived key was rejected by the cipher")]
    InvalidKey,
    #[error("encryption failed")]
    Encrypt,
    #[error("ciphertext is not valid hex: {0}")]
    Encoding(#[from] hex::FromHexError),
    #[error("ciphertext is shorter than nonce and tag")]
    Truncated,
    #[error("decryption failed")]
    Decrypt,
}

/// AES-256-GCM cipher keyed by the SHA-256 digest of the configured secret
/// key. Output is hex(nonce || ciphertext || tag) with a fresh nonce per call.
#[derive(Clone)]
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCipher").finish_non_exhaustive()
    }
}

impl SecretCipher {
    pub fn new(secret_key: &str) -> Result<Self, CipherError> {
        if secret_key.is_empty() {
            return Err(CipherError::EmptyKey);
        }

        let digest = Sha256::digest(secret_key.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&digest).map_err(|_| CipherError::InvalidKey)?;
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(hex::encode(sealed))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let sealed = hex::decode(encoded.trim())?;
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::Truncated);
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::Decrypt)
    }
}
