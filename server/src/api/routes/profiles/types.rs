//! Profile API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::ProfileRow;
use crate::utils::time::timestamp_to_datetime;

/// Profile DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDto {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileDto {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: timestamp_to_datetime(row.created_at),
            updated_at: timestamp_to_datetime(row.updated_at),
        }
    }
}

/// Profile with the caller's effective permission (for listings)
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileWithAccessDto {
    pub id: String,
    pub name: String,
    /// `edit` or `read`; admins always see `edit`
    pub permission: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileWithAccessDto {
    pub fn from_row(row: ProfileRow, can_write: bool) -> Self {
        Self {
            id: row.id,
            name: row.name,
            permission: if can_write { "edit" } else { "read" }.to_string(),
            created_at: timestamp_to_datetime(row.created_at),
            updated_at: timestamp_to_datetime(row.updated_at),
        }
    }
}

/// Request body for creating a profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Request body for renaming a profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}
