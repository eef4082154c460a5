use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::error;

use super::repository::{SecretRepository, SecretSubmission};
use super::service::{Caller, SecretVault, SecretVaultError};
use crate::envelope::MessageEnvelope;

pub struct SecretsState<R> {
    vault: Arc<SecretVault<R>>,
    admin_token: Option<Arc<str>>,
}

impl<R> Clone for SecretsState<R> {
    fn clone(&self) -> Self {
        Self {
            vault: self.vault.clone(),
            admin_token: self.admin_token.clone(),
        }
    }
}

/// Router builder exposing secret creation and rotation.
pub fn secrets_router<R>(vault: Arc<SecretVault<R>>, admin_token: Option<String>) -> Router
where
    R: SecretRepository + 'static,
{
    let state = SecretsState {
        vault,
        admin_token: admin_token.map(Arc::from),
    };

    Router::new()
        .route(
            "/secrets",
            post(add_handler::<R>).put(update_handler::<R>),
        )
        .with_state(state)
}

/// Resolve the caller from a bearer token. Token verification belongs to the
/// gateway in front of this service; here the only distinction is whether the
/// token is the configured admin token.
pub(crate) fn authenticate(headers: &HeaderMap, admin_token: Option<&str>) -> Result<Caller, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    match token {
        Some(token) => Ok(Caller {
            admin: admin_token.is_some_and(|admin| admin == token),
        }),
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(MessageEnvelope::failure("Access denied. No token provided.")),
        )
            .into_response()),
    }
}

pub(crate) async fn add_handler<R>(
    State(state): State<SecretsState<R>>,
    headers: HeaderMap,
    Json(submission): Json<SecretSubmission>,
) -> Response
where
    R: SecretRepository + 'static,
{
    let caller = match authenticate(&headers, state.admin_token.as_deref()) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match state.vault.add(caller, submission) {
        Ok(_) => (StatusCode::OK, Json(MessageEnvelope::success("Secret added!"))).into_response(),
        Err(err) => vault_error_response("add", err),
    }
}

pub(crate) async fn update_handler<R>(
    State(state): State<SecretsState<R>>,
    headers: HeaderMap,
    Json(submission): Json<SecretSubmission>,
) -> Response
where
    R: SecretRepository + 'static,
{
    if let Err(response) = authenticate(&headers, state.admin_token.as_deref()) {
        return response;
    }

    match state.vault.update(submission) {
        Ok(_) => {
            (StatusCode::OK, Json(MessageEnvelope::success("Secret updated!"))).into_response()
        }
        Err(err) => vault_error_response("update", err),
    }
}

fn vault_error_response(operation: &str, err: SecretVaultError) -> Response {
    let status = match &err {
        SecretVaultError::Forbidden => StatusCode::FORBIDDEN,
        SecretVaultError::Blank(_) => StatusCode::BAD_REQUEST,
        SecretVaultError::Conflict => StatusCode::CONFLICT,
        SecretVaultError::NotFound => StatusCode::NOT_FOUND,
        SecretVaultError::Cipher(_) | SecretVaultError::Repository(_) => {
            error!(operation, error = %err, "unable to store secret");
            let body = MessageEnvelope::failure("Something bad happened!");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    (status, Json(MessageEnvelope::failure(err.to_string()))).into_response()
}
