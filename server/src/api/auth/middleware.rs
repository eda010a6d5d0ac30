//! Authentication middleware
//!
//! Resolves the principal for every protected request and stashes the
//! `AuthContext` plus the shared `AccessEngine` in request extensions for
//! the authorization extractors. Principals are created on first
//! authentication: the first one ever becomes admin, everyone else pending.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sqlx::SqlitePool;

use super::context::AuthContext;
use super::jwt::TokenVerifier;
use crate::api::types::ApiError;
use crate::core::constants::LOCAL_USER_ID;
use crate::data::sqlite::repositories::user;
use crate::domain::access::AccessEngine;

/// Shared state for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    pub pool: SqlitePool,
    pub engine: Arc<AccessEngine>,
    /// None when running with `--no-auth`
    pub verifier: Option<Arc<TokenVerifier>>,
}

/// Require authentication on every request passing through
pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = match resolve_context(&state, req.headers()).await {
        Ok(ctx) => ctx,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(ctx);
    req.extensions_mut().insert(state.engine.clone());
    next.run(req).await
}

async fn resolve_context(state: &AuthState, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let Some(verifier) = &state.verifier else {
        return Ok(AuthContext::LocalDefault {
            user_id: LOCAL_USER_ID.to_string(),
        });
    };

    let token = bearer_token(headers).ok_or_else(|| {
        ApiError::unauthorized("UNAUTHENTICATED", "Missing bearer token")
    })?;

    let claims = verifier.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        ApiError::unauthorized("UNAUTHENTICATED", "Invalid or expired token")
    })?;

    let (principal, created) =
        user::get_or_create_by_subject(&state.pool, &claims.sub, claims.email.as_deref())
            .await
            .map_err(ApiError::from_sqlite)?;

    if created {
        tracing::debug!(user_id = %principal.id, "Principal created on first authentication");
    }

    Ok(AuthContext::Session {
        user_id: principal.id,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
