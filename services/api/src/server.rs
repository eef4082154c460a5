use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySecretRepository};
use crate::routes::with_service_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use campus_schedule::config::{AppConfig, SecretsConfig};
use campus_schedule::error::AppError;
use campus_schedule::schedule::{schedule_router, ScheduleQueryEngine, ScheduleStore};
use campus_schedule::secrets::{secrets_router, SecretCipher, SecretVault};
use campus_schedule::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data) = args.data.take() {
        config.schedule.data_path = data;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(ScheduleStore::from_path(&config.schedule.data_path)?);
    let engine = Arc::new(ScheduleQueryEngine::new(
        store,
        config.schedule.primary_faculty.clone(),
    )?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api = with_secrets(schedule_router(engine), &config.secrets)?;
    let app = with_service_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campus schedule service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Mount the secrets routes when a key is configured.
fn with_secrets(api: Router, secrets: &SecretsConfig) -> Result<Router, AppError> {
    let Some(secret_key) = secrets.secret_key.as_deref() else {
        warn!("SECRET_KEY not set; secrets routes disabled");
        return Ok(api);
    };

    if secrets.admin_token.is_none() {
        warn!("APP_ADMIN_TOKEN not set; no caller can add secrets");
    }

    let vault = Arc::new(SecretVault::new(
        Arc::new(InMemorySecretRepository::default()),
        SecretCipher::new(secret_key)?,
    ));
    Ok(api.merge(secrets_router(vault, secrets.admin_token.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn secrets_request(token: &str) -> Request<Body> {
        Request::post("/secrets")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(
                r#"{"key":"DB_URL","env":"production","value":"postgres://db"}"#,
            ))
            .expect("request")
    }

    #[tokio::test]
    async fn secrets_routes_absent_without_key() {
        let app = with_secrets(Router::new(), &SecretsConfig::default()).expect("router builds");
        let response = app
            .oneshot(secrets_request("root"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn secrets_routes_mounted_with_key() {
        let config = SecretsConfig {
            secret_key: Some("vault-key".to_string()),
            admin_token: Some("root".to_string()),
        };
        let app = with_secrets(Router::new(), &config).expect("router builds");
        let response = app
            .oneshot(secrets_request("root"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
