//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::auth::{AuthState, TokenVerifier, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::openapi_json;
use super::routes::{analytics, entries, health, profiles, users};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::domain::access::AccessEngine;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Serve until shutdown; returns the CoreApp for graceful teardown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let pool = app.database.pool().clone();
        let engine = Arc::new(AccessEngine::new(pool.clone()));

        let verifier = match (app.config.auth.enabled, app.config.auth.secret.as_deref()) {
            (true, Some(secret)) => Some(Arc::new(TokenVerifier::new(secret))),
            _ => None,
        };
        let auth_state = AuthState {
            pool: pool.clone(),
            engine: engine.clone(),
            verifier,
        };

        let protected = Router::new()
            .nest("/users", users::routes(pool.clone(), engine.clone()))
            .nest("/profiles", profiles::routes(pool.clone()))
            .nest(
                "/profiles/{profile_id}/entries",
                entries::routes(pool.clone()),
            )
            .nest(
                "/analytics",
                analytics::routes(pool.clone(), app.config.analytics.totals_tolerance),
            )
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                require_auth,
            ));

        let api = Router::new()
            .route("/health", get(health::health))
            .route("/openapi.json", get(openapi_json))
            .merge(protected);

        let router = Router::new()
            .nest("/api/v1", api)
            .fallback(middleware::handle_404)
            .layer(middleware::cors(&allowed_origins))
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on http://{}", addr);

        let mut shutdown_rx = shutdown.subscribe();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow() {
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        Ok(app)
    }
}
