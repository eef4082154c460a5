use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::secrets::repository::{RepositoryError, SecretId, SecretRepository, StoredSecret};
use crate::secrets::{SecretCipher, SecretSubmission, SecretVault};

pub(super) const SECRET_KEY: &str = "unit-test-secret-key";
pub(super) const ADMIN_TOKEN: &str = "admin-token";

#[derive(Default)]
pub(super) struct MemorySecrets {
    pub(super) records: Mutex<HashMap<SecretId, StoredSecret>>,
}

impl SecretRepository for MemorySecrets {
    fn find(&self, id: &SecretId) -> Result<Option<StoredSecret>, RepositoryError> {
        Ok(self.records.lock().expect("secrets mutex").get(id).cloned())
    }

    fn insert(&self, secret: StoredSecret) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("secrets mutex");
        if guard.contains_key(&secret.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(secret.id.clone(), secret);
        Ok(())
    }

    fn update(&self, secret: StoredSecret) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("secrets mutex");
        match guard.get_mut(&secret.id) {
            Some(existing) => {
                *existing = secret;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

pub(super) struct UnavailableSecrets;

impl SecretRepository for UnavailableSecrets {
    fn find(&self, _id: &SecretId) -> Result<Option<StoredSecret>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _secret: StoredSecret) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _secret: StoredSecret) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn cipher() -> SecretCipher {
    SecretCipher::new(SECRET_KEY).expect("cipher builds")
}

pub(super) fn vault() -> (Arc<SecretVault<MemorySecrets>>, Arc<MemorySecrets>) {
    let repository = Arc::new(MemorySecrets::default());
    let vault = Arc::new(SecretVault::new(repository.clone(), cipher()));
    (vault, repository)
}

pub(super) fn submission(key: &str, value: &str) -> SecretSubmission {
    SecretSubmission {
        key: key.to_string(),
        env: "dev".to_string(),
        value: value.to_string(),
    }
}

pub(super) fn secret_id(key: &str) -> SecretId {
    SecretId {
        key: key.to_string(),
        env: "dev".to_string(),
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
