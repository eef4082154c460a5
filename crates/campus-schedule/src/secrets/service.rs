use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::cipher::{CipherError, SecretCipher};
use super::repository::{RepositoryError, SecretRepository, SecretSubmission, StoredSecret};

/// Identity handed over by the authentication boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub admin: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SecretVaultError {
    #[error("Access denied. You must be an admin!")]
    Forbidden,
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("Secret already exists! If you want to change it apply an UPDATE operation.")]
    Conflict,
    #[error("Secret doesn't exists! If you want to add it apply a POST call.")]
    NotFound,
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SecretVaultError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::Conflict,
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// Encrypts secret values before handing them to the repository.
pub struct SecretVault<R> {
    repository: Arc<R>,
    cipher: SecretCipher,
}

impl<R> SecretVault<R>
where
    R: SecretRepository + 'static,
{
    pub fn new(repository: Arc<R>, cipher: SecretCipher) -> Self {
        Self { repository, cipher }
    }

    /// Store a new secret. Only admins may add secrets.
    pub fn add(
        &self,
        caller: Caller,
        submission: SecretSubmission,
    ) -> Result<StoredSecret, SecretVaultError> {
        if !caller.admin {
            return Err(SecretVaultError::Forbidden);
        }
        validate(&submission)?;

        let id = submission.id();
        if self.repository.find(&id)?.is_some() {
            return Err(SecretVaultError::Conflict);
        }

        let secret = StoredSecret {
            value: self.cipher.encrypt(&submission.value)?,
            id,
            updated_at: Utc::now(),
        };
        self.repository.insert(secret.clone())?;

        info!(key = %secret.id.key, env = %secret.id.env, "secret added");
        Ok(secret)
    }

    /// Replace the value of an existing secret. Any authenticated caller may
    /// rotate a value.
    pub fn update(
        &self,
        submission: SecretSubmission,
    ) -> Result<StoredSecret, SecretVaultError> {
        validate(&submission)?;

        let id = submission.id();
        if self.repository.find(&id)?.is_none() {
            return Err(SecretVaultError::NotFound);
        }

        let secret = StoredSecret {
            value: self.cipher.encrypt(&submission.value)?,
            id,
            updated_at: Utc::now(),
        };
        self.repository.update(secret.clone())?;

        info!(key = %secret.id.key, env = %secret.id.env, "secret updated");
        Ok(secret)
    }
}

fn validate(submission: &SecretSubmission) -> Result<(), SecretVaultError> {
    if submission.key.trim().is_empty() {
        return Err(SecretVaultError::Blank("key"));
    }
    if submission.env.trim().is_empty() {
        return Err(SecretVaultError::Blank("env"));
    }
    Ok(())
}
