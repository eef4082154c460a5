//! Encrypted key/value secrets, scoped per deployment environment.

pub mod cipher;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cipher::{CipherError, SecretCipher};
pub use repository::{RepositoryError, SecretId, SecretRepository, SecretSubmission, StoredSecret};
pub use router::secrets_router;
pub use service::{Caller, SecretVault, SecretVaultError};
