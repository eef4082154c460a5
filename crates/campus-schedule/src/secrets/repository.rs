use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Secrets are unique per key and deployment environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecretId {
    pub key: String,
    pub env: String,
}

/// Client payload for add and update calls. `value` is plaintext until the
/// vault encrypts it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretSubmission {
    pub key: String,
    pub env: String,
    pub value: String,
}

impl SecretSubmission {
    pub fn id(&self) -> SecretId {
        SecretId {
            key: self.key.clone(),
            env: self.env.clone(),
        }
    }
}

/// Persisted form; `value` only ever holds ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSecret {
    pub id: SecretId,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so the vault can be exercised without a database.
pub trait SecretRepository: Send + Sync {
    fn find(&self, id: &SecretId) -> Result<Option<StoredSecret>, RepositoryError>;
    fn insert(&self, secret: StoredSecret) -> Result<(), RepositoryError>;
    fn update(&self, secret: StoredSecret) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("secret already exists")]
    Conflict,
    #[error("secret not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
