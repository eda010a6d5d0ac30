//! Profile API endpoints
//!
//! Listing is visibility-filtered per caller. Creation is open to admins and
//! approved users (who get auto-linked with edit); rename and delete are
//! admin-only, and delete cascades links and entries at the storage layer.

pub mod types;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::auth::{AdminOnly, Auth};
use crate::api::extractors::{ValidatedJson, is_valid_id};
use crate::api::types::ApiError;
use crate::core::constants::PERMISSION_EDIT;
use crate::data::sqlite::repositories::{link, profile};
use crate::domain::access::{DenyReason, Visibility};

use types::{CreateProfileRequest, ProfileDto, ProfileWithAccessDto, UpdateProfileRequest};

/// Path parameters for profile-specific routes
#[derive(Deserialize)]
pub struct ProfilePath {
    pub profile_id: String,
}

/// Shared state for Profiles API endpoints
#[derive(Clone)]
pub struct ProfilesApiState {
    pub pool: SqlitePool,
}

/// Build Profiles API routes
pub fn routes(pool: SqlitePool) -> Router<()> {
    let state = ProfilesApiState { pool };

    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/{profile_id}",
            axum::routing::put(update_profile).delete(delete_profile),
        )
        .with_state(state)
}

/// List the profiles visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "profiles",
    responses(
        (status = 200, description = "Visible profiles with effective permission")
    )
)]
pub async fn list_profiles(
    State(state): State<ProfilesApiState>,
    auth: Auth,
) -> Result<Json<Vec<ProfileWithAccessDto>>, ApiError> {
    let snapshot = auth.engine.snapshot(auth.principal_id()).await?;

    let rows = match snapshot.visible_profiles() {
        Visibility::All => profile::list_profiles(&state.pool)
            .await
            .map_err(ApiError::from_sqlite)?,
        Visibility::Profiles(ids) => {
            let ids: Vec<String> = ids.into_iter().collect();
            profile::list_profiles_by_ids(&state.pool, &ids)
                .await
                .map_err(ApiError::from_sqlite)?
        }
    };

    let data = rows
        .into_iter()
        .map(|row| {
            let can_write = snapshot.can_write(&row.id);
            ProfileWithAccessDto::from_row(row, can_write)
        })
        .collect();

    Ok(Json(data))
}

/// Create a profile (admin or approved user; the latter is auto-linked edit)
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileDto),
        (status = 403, description = "Account not approved")
    )
)]
pub async fn create_profile(
    State(state): State<ProfilesApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileDto>), ApiError> {
    let snapshot = auth.engine.snapshot(auth.principal_id()).await?;

    if !snapshot.can_create_profiles() {
        return Err(ApiError::forbidden(
            "NOT_APPROVED",
            format!(
                "Cannot create profiles: {}",
                DenyReason::NotApproved
            ),
        ));
    }

    let created = profile::create_profile(&state.pool, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?;

    // Non-admin creators keep access through a link like everyone else
    if !snapshot.is_admin() {
        link::upsert_link(
            &state.pool,
            snapshot.principal().id.as_str(),
            &created.id,
            PERMISSION_EDIT,
        )
        .await
        .map_err(ApiError::from_sqlite)?;
    }

    Ok((StatusCode::CREATED, Json(ProfileDto::from(created))))
}

/// Rename a profile (admin)
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{profile_id}",
    tag = "profiles",
    params(
        ("profile_id" = String, Path, description = "Profile ID")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile renamed", body = ProfileDto),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    State(state): State<ProfilesApiState>,
    _admin: AdminOnly,
    Path(path): Path<ProfilePath>,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileDto>, ApiError> {
    if !is_valid_id(&path.profile_id) {
        return Err(ApiError::bad_request(
            "INVALID_PROFILE_ID",
            "Invalid profile_id",
        ));
    }

    let updated = profile::update_profile(&state.pool, &path.profile_id, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found(
                "PROFILE_NOT_FOUND",
                format!("Profile not found: {}", path.profile_id),
            )
        })?;

    Ok(Json(ProfileDto::from(updated)))
}

/// Delete a profile and cascade its links and entries (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{profile_id}",
    tag = "profiles",
    params(
        ("profile_id" = String, Path, description = "Profile ID")
    ),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    State(state): State<ProfilesApiState>,
    _admin: AdminOnly,
    Path(path): Path<ProfilePath>,
) -> Result<StatusCode, ApiError> {
    if !is_valid_id(&path.profile_id) {
        return Err(ApiError::bad_request(
            "INVALID_PROFILE_ID",
            "Invalid profile_id",
        ));
    }

    let deleted = profile::delete_profile(&state.pool, &path.profile_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deleted {
        return Err(ApiError::not_found(
            "PROFILE_NOT_FOUND",
            format!("Profile not found: {}", path.profile_id),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
