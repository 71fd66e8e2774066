use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use api::AppState;
use axum::{
    Router,
    http::{self, HeaderName, HeaderValue, Method},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState, origins: &[String]) -> anyhow::Result<()> {
    let router = build_router(state, origins);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "ems server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    info!("ems server stopped");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    // Credentialed CORS cannot answer with a wildcard, so an empty list mirrors
    // the caller's origin instead.
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_credentials(true)
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(allow_origin)
}

/// The api router wrapped in the HTTP middleware stack.
pub fn build_router(state: AppState, origins: &[String]) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    api::router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
            .layer(PropagateRequestIdLayer::new(header_name))
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors_layer(origins)),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use api::{ApiSettings, AuthConfig, mailer::LogMailer};
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use sea_orm::Database;
    use tower::ServiceExt;

    use super::*;

    async fn router(origins: &[String]) -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let auth = AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl_days: 1,
            cookie_secure: false,
        };
        let state = AppState::new(db, auth, ApiSettings::default(), Arc::new(LogMailer));
        build_router(state, origins)
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = router(&[]).await;
        let res = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let app = router(&["http://localhost:5173".to_string()]).await;
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/leave/all")
                    .header(http::header::ORIGIN, "http://localhost:5173")
                    .header(http::header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let headers = res.headers();
        assert_eq!(
            headers[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(headers[http::header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
