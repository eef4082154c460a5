use campus_schedule::secrets::{RepositoryError, SecretId, SecretRepository, StoredSecret};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local secret storage. Values are ciphertext by the time they get here.
#[derive(Default, Clone)]
pub(crate) struct InMemorySecretRepository {
    records: Arc<Mutex<HashMap<SecretId, StoredSecret>>>,
}

impl InMemorySecretRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<SecretId, StoredSecret>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("secret store mutex poisoned".to_string()))
    }
}

impl SecretRepository for InMemorySecretRepository {
    fn find(&self, id: &SecretId) -> Result<Option<StoredSecret>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn insert(&self, secret: StoredSecret) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&secret.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(secret.id.clone(), secret);
        Ok(())
    }

    fn update(&self, secret: StoredSecret) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        match guard.get_mut(&secret.id) {
            Some(existing) => {
                *existing = secret;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
