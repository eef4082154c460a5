use super::common::*;
use std::sync::Arc;

use crate::secrets::{Caller, SecretRepository, SecretVault, SecretVaultError};

const ADMIN: Caller = Caller { admin: true };
const MEMBER: Caller = Caller { admin: false };

#[test]
fn add_stores_only_ciphertext() {
    let (vault, repository) = vault();

    let stored = vault
        .add(ADMIN, submission("JWT_KEY", "super-secret"))
        .expect("secret added");

    assert_ne!(stored.value, "super-secret");
    let persisted = repository
        .find(&secret_id("JWT_KEY"))
        .expect("repository reachable")
        .expect("secret persisted");
    assert_eq!(persisted, stored);
    assert_eq!(cipher().decrypt(&persisted.value).expect("decrypts"), "super-secret");
}

#[test]
fn add_requires_admin() {
    let (vault, repository) = vault();

    let err = vault
        .add(MEMBER, submission("JWT_KEY", "value"))
        .expect_err("non-admin rejected");

    assert!(matches!(err, SecretVaultError::Forbidden));
    assert!(repository.records.lock().expect("secrets mutex").is_empty());
}

#[test]
fn add_rejects_duplicates_per_environment() {
    let (vault, _) = vault();
    vault
        .add(ADMIN, submission("JWT_KEY", "first"))
        .expect("first add");

    let err = vault
        .add(ADMIN, submission("JWT_KEY", "second"))
        .expect_err("duplicate rejected");
    assert!(matches!(err, SecretVaultError::Conflict));

    let mut prod = submission("JWT_KEY", "prod-value");
    prod.env = "prod".to_string();
    vault.add(ADMIN, prod).expect("other environment accepted");
}

#[test]
fn add_rejects_blank_identifiers() {
    let (vault, _) = vault();
    let err = vault
        .add(ADMIN, submission("  ", "value"))
        .expect_err("blank key");
    assert!(matches!(err, SecretVaultError::Blank("key")));
}

#[test]
fn update_replaces_existing_value() {
    let (vault, repository) = vault();
    vault
        .add(ADMIN, submission("JWT_KEY", "old"))
        .expect("secret added");

    vault
        .update(submission("JWT_KEY", "new"))
        .expect("secret updated");

    let persisted = repository
        .find(&secret_id("JWT_KEY"))
        .expect("repository reachable")
        .expect("secret persisted");
    assert_eq!(cipher().decrypt(&persisted.value).expect("decrypts"), "new");
}

#[test]
fn update_of_missing_secret_is_not_found() {
    let (vault, _) = vault();
    let err = vault
        .update(submission("MISSING", "value"))
        .expect_err("missing secret");
    assert!(matches!(err, SecretVaultError::NotFound));
}

#[test]
fn repository_outage_is_surfaced() {
    let vault = SecretVault::new(Arc::new(UnavailableSecrets), cipher());
    let err = vault
        .add(ADMIN, submission("JWT_KEY", "value"))
        .expect_err("outage");
    assert!(matches!(err, SecretVaultError::Repository(_)));
}
