//! Financial entry API endpoints
//!
//! Mounted under `/profiles/{profile_id}/entries`. Every mutation passes a
//! write check in its extractor; a read-only link gets a 403 with the
//! read-only reason, never a silent no-op.

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sqlx::SqlitePool;

use crate::api::auth::{EntryDelete, EntryUpdate, ProfileInsert, ProfileRead};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::SqliteError;
use crate::data::sqlite::repositories::{entry, profile};
use crate::data::types::invalid_amount_fields;

use types::{EntryBody, EntryDto, ListEntriesQuery};

/// Shared state for Entries API endpoints
#[derive(Clone)]
pub struct EntriesApiState {
    pub pool: SqlitePool,
}

/// Build Entries API routes (nested under a profile)
pub fn routes(pool: SqlitePool) -> Router<()> {
    let state = EntriesApiState { pool };

    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route(
            "/{entry_id}",
            axum::routing::put(update_entry).delete(delete_entry),
        )
        .with_state(state)
}

async fn require_profile_exists(pool: &SqlitePool, profile_id: &str) -> Result<(), ApiError> {
    profile::get_profile(pool, profile_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .map(|_| ())
        .ok_or_else(|| {
            ApiError::not_found(
                "PROFILE_NOT_FOUND",
                format!("Profile not found: {}", profile_id),
            )
        })
}

fn check_amounts(body: &EntryBody) -> Result<(), ApiError> {
    let errors = invalid_amount_fields(&body.high_medium_risk, &body.low_risk);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::bad_request("VALIDATION_ERROR", errors.join("; ")))
    }
}

fn map_entry_error(e: SqliteError) -> ApiError {
    match e {
        SqliteError::Conflict(message) => ApiError::conflict("DUPLICATE_ENTRY", message),
        other => ApiError::from_sqlite(other),
    }
}

/// List a profile's entries, optionally bounded by date
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{profile_id}/entries",
    tag = "entries",
    params(
        ("profile_id" = String, Path, description = "Profile ID"),
        ("from" = Option<String>, Query, description = "Inclusive lower date bound"),
        ("to" = Option<String>, Query, description = "Inclusive upper date bound")
    ),
    responses(
        (status = 200, description = "Entries ordered by date"),
        (status = 403, description = "No access to this profile"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn list_entries(
    State(state): State<EntriesApiState>,
    access: ProfileRead,
    ValidatedQuery(query): ValidatedQuery<ListEntriesQuery>,
) -> Result<Json<Vec<EntryDto>>, ApiError> {
    require_profile_exists(&state.pool, &access.profile_id).await?;

    let rows = entry::list_entries(
        &state.pool,
        &access.profile_id,
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await
    .map_err(ApiError::from_sqlite)?;

    Ok(Json(rows.into_iter().map(EntryDto::from).collect()))
}

/// Create an entry (edit permission required)
#[utoipa::path(
    post,
    path = "/api/v1/profiles/{profile_id}/entries",
    tag = "entries",
    params(
        ("profile_id" = String, Path, description = "Profile ID")
    ),
    request_body = EntryBody,
    responses(
        (status = 201, description = "Entry created", body = EntryDto),
        (status = 400, description = "Invalid date or amounts"),
        (status = 403, description = "Edit permission required"),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "An entry already exists for this date")
    )
)]
pub async fn create_entry(
    State(state): State<EntriesApiState>,
    access: ProfileInsert,
    ValidatedJson(body): ValidatedJson<EntryBody>,
) -> Result<(StatusCode, Json<EntryDto>), ApiError> {
    require_profile_exists(&state.pool, &access.profile_id).await?;
    check_amounts(&body)?;

    let created = entry::insert_entry(
        &state.pool,
        &access.profile_id,
        &body.into_new_entry(),
        Some(access.principal_id.as_str()),
    )
    .await
    .map_err(map_entry_error)?;

    Ok((StatusCode::CREATED, Json(EntryDto::from(created))))
}

/// Update an entry, re-deriving totals (edit permission required)
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{profile_id}/entries/{entry_id}",
    tag = "entries",
    params(
        ("profile_id" = String, Path, description = "Profile ID"),
        ("entry_id" = String, Path, description = "Entry ID")
    ),
    request_body = EntryBody,
    responses(
        (status = 200, description = "Entry updated", body = EntryDto),
        (status = 400, description = "Invalid date or amounts"),
        (status = 403, description = "Edit permission required"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "An entry already exists for this date")
    )
)]
pub async fn update_entry(
    State(state): State<EntriesApiState>,
    access: EntryUpdate,
    ValidatedJson(body): ValidatedJson<EntryBody>,
) -> Result<Json<EntryDto>, ApiError> {
    check_amounts(&body)?;

    let updated = entry::update_entry(
        &state.pool,
        &access.profile_id,
        &access.entry_id,
        &body.into_new_entry(),
    )
    .await
    .map_err(map_entry_error)?
    .ok_or_else(|| {
        ApiError::not_found(
            "ENTRY_NOT_FOUND",
            format!("Entry not found: {}", access.entry_id),
        )
    })?;

    Ok(Json(EntryDto::from(updated)))
}

/// Delete an entry (edit permission required)
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{profile_id}/entries/{entry_id}",
    tag = "entries",
    params(
        ("profile_id" = String, Path, description = "Profile ID"),
        ("entry_id" = String, Path, description = "Entry ID")
    ),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 403, description = "Edit permission required"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn delete_entry(
    State(state): State<EntriesApiState>,
    access: EntryDelete,
) -> Result<StatusCode, ApiError> {
    let deleted = entry::delete_entry(&state.pool, &access.profile_id, &access.entry_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deleted {
        return Err(ApiError::not_found(
            "ENTRY_NOT_FOUND",
            format!("Entry not found: {}", access.entry_id),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
