//! User API endpoints
//!
//! Carries the admin approval workflow: listing principals, approving them
//! with profile grants, rejecting them, and editing grant sets.

pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::auth::{AdminOnly, Auth};
use crate::api::extractors::{ValidatedJson, is_valid_id};
use crate::api::types::ApiError;
use crate::core::constants::ROLE_APPROVED;
use crate::data::sqlite::repositories::{link, user};
use crate::data::types::{LinkRow, Permission, Role};
use crate::domain::access::{AccessEngine, LinkGrant};

use types::{ApproveUserRequest, LinkDto, ReplaceLinksRequest, UserDto};

/// Path parameters for user-specific routes
#[derive(Deserialize)]
pub struct UserPath {
    pub user_id: String,
}

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub pool: SqlitePool,
    pub engine: Arc<AccessEngine>,
}

/// Build Users API routes
pub fn routes(pool: SqlitePool, engine: Arc<AccessEngine>) -> Router<()> {
    let state = UsersApiState { pool, engine };

    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/{user_id}/approve", post(approve_user))
        .route("/{user_id}/reject", post(reject_user))
        .route("/{user_id}/links", put(replace_user_links))
        .with_state(state)
}

/// Get the current principal with its profile grants
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserDto)
    )
)]
pub async fn get_current_user(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<UserDto>, ApiError> {
    let user = user::get_user(&state.pool, auth.principal_id())
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::unauthorized("UNAUTHENTICATED", "Principal no longer exists"))?;

    let links = link::list_links_for_user(&state.pool, &user.id)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(UserDto::from_row(user, links)))
}

/// List all users with their grants (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "All users"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    _admin: AdminOnly,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = user::list_users(&state.pool)
        .await
        .map_err(ApiError::from_sqlite)?;

    let mut links_by_user: HashMap<String, Vec<LinkRow>> = HashMap::new();
    for row in link::list_all_links(&state.pool)
        .await
        .map_err(ApiError::from_sqlite)?
    {
        links_by_user.entry(row.user_id.clone()).or_default().push(row);
    }

    let data = users
        .into_iter()
        .map(|u| {
            let links = links_by_user.remove(&u.id).unwrap_or_default();
            UserDto::from_row(u, links)
        })
        .collect();

    Ok(Json(data))
}

/// Approve a user, setting its role and creating profile grants (admin)
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/approve",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "Target user ID")
    ),
    request_body = ApproveUserRequest,
    responses(
        (status = 200, description = "User approved", body = UserDto),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Role transition not allowed")
    )
)]
pub async fn approve_user(
    State(state): State<UsersApiState>,
    admin: AdminOnly,
    Path(path): Path<UserPath>,
    ValidatedJson(body): ValidatedJson<ApproveUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    if !is_valid_id(&path.user_id) {
        return Err(ApiError::bad_request("INVALID_USER_ID", "Invalid user_id"));
    }

    let role = Role::parse(body.role.as_deref().unwrap_or(ROLE_APPROVED));
    let grants: Vec<LinkGrant> = body
        .links
        .iter()
        .map(|l| LinkGrant {
            profile_id: l.profile_id.clone(),
            permission: Permission::parse(&l.permission),
        })
        .collect();

    let updated = state
        .engine
        .approve_principal(&admin.admin.id, &path.user_id, role, &grants)
        .await?;

    let links = link::list_links_for_user(&state.pool, &updated.id)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(UserDto::from_row(updated, links)))
}

/// Reject a user, deleting the principal and its grants (admin)
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/reject",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "Target user ID")
    ),
    responses(
        (status = 204, description = "User rejected and removed"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reject_user(
    State(state): State<UsersApiState>,
    admin: AdminOnly,
    Path(path): Path<UserPath>,
) -> Result<StatusCode, ApiError> {
    if !is_valid_id(&path.user_id) {
        return Err(ApiError::bad_request("INVALID_USER_ID", "Invalid user_id"));
    }

    state
        .engine
        .reject_principal(&admin.admin.id, &path.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Replace a user's grant set (admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/links",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "Target user ID")
    ),
    request_body = ReplaceLinksRequest,
    responses(
        (status = 200, description = "New grant set"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn replace_user_links(
    State(state): State<UsersApiState>,
    admin: AdminOnly,
    Path(path): Path<UserPath>,
    ValidatedJson(body): ValidatedJson<ReplaceLinksRequest>,
) -> Result<Json<Vec<LinkDto>>, ApiError> {
    if !is_valid_id(&path.user_id) {
        return Err(ApiError::bad_request("INVALID_USER_ID", "Invalid user_id"));
    }

    let grants: Vec<LinkGrant> = body
        .links
        .iter()
        .map(|l| LinkGrant {
            profile_id: l.profile_id.clone(),
            permission: Permission::parse(&l.permission),
        })
        .collect();

    let links = state
        .engine
        .replace_links(&admin.admin.id, &path.user_id, &grants)
        .await?;

    Ok(Json(links.into_iter().map(LinkDto::from).collect()))
}
