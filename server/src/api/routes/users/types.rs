//! User API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::core::constants::{PERMISSION_EDIT, PERMISSION_READ, ROLE_ADMIN, ROLE_APPROVED};
use crate::data::types::{LinkRow, UserRow};
use crate::utils::time::timestamp_to_datetime;

/// Profile link DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LinkDto {
    pub profile_id: String,
    pub permission: String,
}

impl From<LinkRow> for LinkDto {
    fn from(row: LinkRow) -> Self {
        Self {
            profile_id: row.profile_id,
            permission: row.permission,
        }
    }
}

/// User DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub links: Vec<LinkDto>,
}

impl UserDto {
    pub fn from_row(row: UserRow, links: Vec<LinkRow>) -> Self {
        Self {
            id: row.id,
            email: row.email,
            role: row.role,
            approved_at: row.approved_at.map(timestamp_to_datetime),
            created_at: timestamp_to_datetime(row.created_at),
            links: links.into_iter().map(LinkDto::from).collect(),
        }
    }
}

/// A single profile grant in an approval or link-edit request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LinkGrantRequest {
    #[validate(length(min = 1, max = 256, message = "profile_id must be 1-256 characters"))]
    pub profile_id: String,

    #[validate(custom(function = "validate_permission"))]
    pub permission: String,
}

/// Request body for approving a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApproveUserRequest {
    /// Target role; defaults to `approved`
    #[validate(custom(function = "validate_approval_role"))]
    pub role: Option<String>,

    /// Profile grants to create; empty is valid (no access until edited)
    #[serde(default)]
    #[validate(nested)]
    pub links: Vec<LinkGrantRequest>,
}

/// Request body for replacing a user's grant set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceLinksRequest {
    #[validate(nested)]
    pub links: Vec<LinkGrantRequest>,
}

fn validate_permission(permission: &str) -> Result<(), ValidationError> {
    if permission == PERMISSION_READ || permission == PERMISSION_EDIT {
        Ok(())
    } else {
        Err(ValidationError::new("permission")
            .with_message("permission must be 'read' or 'edit'".into()))
    }
}

fn validate_approval_role(role: &str) -> Result<(), ValidationError> {
    if role == ROLE_APPROVED || role == ROLE_ADMIN {
        Ok(())
    } else {
        Err(ValidationError::new("role")
            .with_message("role must be 'approved' or 'admin'".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_approve_request() {
        let req = ApproveUserRequest {
            role: Some("approved".to_string()),
            links: vec![LinkGrantRequest {
                profile_id: "p1".to_string(),
                permission: "read".to_string(),
            }],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_approve_rejects_unknown_role() {
        let req = ApproveUserRequest {
            role: Some("pending".to_string()),
            links: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_approve_rejects_bad_permission() {
        let req = ApproveUserRequest {
            role: None,
            links: vec![LinkGrantRequest {
                profile_id: "p1".to_string(),
                permission: "write".to_string(),
            }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_links_is_valid() {
        let req = ApproveUserRequest {
            role: None,
            links: vec![],
        };
        assert!(req.validate().is_ok());
    }
}
