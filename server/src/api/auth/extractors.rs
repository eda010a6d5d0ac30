//! Authorization extractors for axum handlers
//!
//! These combine the authenticated context (from middleware) with an access
//! engine decision into a single extraction step, so a handler that takes
//! `ProfileUpdate` cannot run without the write check having passed.

use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::Deserialize;

use super::context::AuthContext;
use crate::api::extractors::{ValidationRejection, is_valid_id};
use crate::api::types::ApiError;
use crate::data::types::UserRow;
use crate::domain::access::{AccessEngine, Operation};

// ============================================================================
// Operation Markers
// ============================================================================

/// Marker trait tying an extractor to the operation it authorizes
pub trait OperationLevel: Send + Sync + 'static {
    const OPERATION: Operation;
}

/// Read marker (list/get entries)
pub struct Read;
impl OperationLevel for Read {
    const OPERATION: Operation = Operation::Read;
}

/// Insert marker (create entries)
pub struct Insert;
impl OperationLevel for Insert {
    const OPERATION: Operation = Operation::Insert;
}

/// Update marker (modify entries)
pub struct Update;
impl OperationLevel for Update {
    const OPERATION: Operation = Operation::Update;
}

/// Delete marker (remove entries)
pub struct Delete;
impl OperationLevel for Delete {
    const OPERATION: Operation = Operation::Delete;
}

// ============================================================================
// Auth Rejection
// ============================================================================

/// Rejection type for auth extractors
pub enum AuthRejection {
    /// Path extraction or validation failed
    Path(ValidationRejection),
    /// Authorization failed
    Auth(ApiError),
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl From<ValidationRejection> for AuthRejection {
    fn from(v: ValidationRejection) -> Self {
        Self::Path(v)
    }
}

impl From<ApiError> for AuthRejection {
    fn from(e: ApiError) -> Self {
        Self::Auth(e)
    }
}

impl axum::response::IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Path(v) => v.into_response(),
            Self::Auth(e) => e.into_response(),
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract auth context and engine from request extensions
fn extract_auth(parts: &Parts) -> Result<(AuthContext, Arc<AccessEngine>), AuthRejection> {
    let ctx = parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .ok_or(AuthRejection::MissingContext)?;

    let engine = parts
        .extensions
        .get::<Arc<AccessEngine>>()
        .cloned()
        .ok_or(AuthRejection::MissingContext)?;

    Ok((ctx, engine))
}

// ============================================================================
// Simple Auth Extractor (no path parameters)
// ============================================================================

/// Authenticated context without a resource check.
///
/// Use for routes whose authorization depends on the request body or on a
/// visibility computation (list profiles, analytics).
pub struct Auth {
    pub ctx: AuthContext,
    pub engine: Arc<AccessEngine>,
}

impl Auth {
    pub fn principal_id(&self) -> &str {
        self.ctx.user_id()
    }
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (ctx, engine) = extract_auth(parts)?;
        Ok(Self { ctx, engine })
    }
}

// ============================================================================
// Profile Access Extractors
// ============================================================================

#[derive(Deserialize)]
struct ProfileParams {
    profile_id: String,
}

/// Verified profile access with a parameterized operation.
///
/// Extracts `profile_id` from the path and runs the access engine check for
/// `Op::OPERATION` before the handler body executes.
pub struct ProfileAccess<Op: OperationLevel = Read> {
    /// The validated profile ID from the path
    pub profile_id: String,
    /// The resolved principal
    pub principal_id: String,
    _op: PhantomData<Op>,
}

/// Type alias for profile access with the read operation
pub type ProfileRead = ProfileAccess<Read>;

/// Type alias for profile access with the insert operation
pub type ProfileInsert = ProfileAccess<Insert>;

impl<S, Op> FromRequestParts<S> for ProfileAccess<Op>
where
    S: Send + Sync,
    Op: OperationLevel,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<ProfileParams>::from_request_parts(parts, _state)
            .await
            .map_err(|e| AuthRejection::Path(ValidationRejection::Path(e)))?;

        if !is_valid_id(&params.profile_id) {
            return Err(AuthRejection::Path(ValidationRejection::InvalidProfileId));
        }

        let (ctx, engine) = extract_auth(parts)?;
        let principal_id = ctx.user_id().to_string();

        match Op::OPERATION {
            Operation::Read => engine.require_read(&principal_id, &params.profile_id).await,
            op => {
                engine
                    .require_write(&principal_id, &params.profile_id, op)
                    .await
            }
        }
        .map_err(ApiError::from)?;

        Ok(Self {
            profile_id: params.profile_id,
            principal_id,
            _op: PhantomData,
        })
    }
}

// ============================================================================
// Entry Access Extractors
// ============================================================================

#[derive(Deserialize)]
struct EntryParams {
    profile_id: String,
    entry_id: String,
}

/// Verified entry access with a parameterized operation.
///
/// Extracts `profile_id` and `entry_id` from the path; the permission check
/// runs against the profile (links grant access per profile, not per row).
pub struct EntryAccess<Op: OperationLevel> {
    pub profile_id: String,
    pub entry_id: String,
    pub principal_id: String,
    _op: PhantomData<Op>,
}

/// Type alias for entry access with the update operation
pub type EntryUpdate = EntryAccess<Update>;

/// Type alias for entry access with the delete operation
pub type EntryDelete = EntryAccess<Delete>;

impl<S, Op> FromRequestParts<S> for EntryAccess<Op>
where
    S: Send + Sync,
    Op: OperationLevel,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<EntryParams>::from_request_parts(parts, _state)
            .await
            .map_err(|e| AuthRejection::Path(ValidationRejection::Path(e)))?;

        if !is_valid_id(&params.profile_id) {
            return Err(AuthRejection::Path(ValidationRejection::InvalidProfileId));
        }
        if !is_valid_id(&params.entry_id) {
            return Err(AuthRejection::Path(ValidationRejection::InvalidEntryId));
        }

        let (ctx, engine) = extract_auth(parts)?;
        let principal_id = ctx.user_id().to_string();

        match Op::OPERATION {
            Operation::Read => engine.require_read(&principal_id, &params.profile_id).await,
            op => {
                engine
                    .require_write(&principal_id, &params.profile_id, op)
                    .await
            }
        }
        .map_err(ApiError::from)?;

        Ok(Self {
            profile_id: params.profile_id,
            entry_id: params.entry_id,
            principal_id,
            _op: PhantomData,
        })
    }
}

// ============================================================================
// Admin Extractor
// ============================================================================

/// Verified admin access.
///
/// Use for the approval workflow and profile management routes.
pub struct AdminOnly {
    pub admin: UserRow,
}

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (ctx, engine) = extract_auth(parts)?;
        let admin = engine
            .require_admin(ctx.user_id())
            .await
            .map_err(ApiError::from)?;

        Ok(Self { admin })
    }
}
