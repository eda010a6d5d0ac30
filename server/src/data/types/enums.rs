//! Role and permission enums
//!
//! Rows store these as strings (checked by the schema); the access engine
//! parses them at its boundary. Unknown strings degrade to the least
//! privilege rather than erroring.

use serde::{Deserialize, Serialize};

/// User role, set by the admin approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Approved,
    #[default]
    Pending,
    Rejected,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a stored role string. Unknown values map to `Pending` so a
    /// corrupted row can never grant access it would not otherwise have.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile link permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Read,
    Edit,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Edit => "edit",
        }
    }

    /// Parse a stored permission string. Unknown values map to `Read`
    /// (least privilege).
    pub fn parse(s: &str) -> Self {
        match s {
            "edit" => Self::Edit,
            _ => Self::Read,
        }
    }

    pub fn allows_write(&self) -> bool {
        matches!(self, Self::Edit)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Approved, Role::Pending, Role::Rejected] {
            assert_eq!(Role::parse(role.as_str()), role);
        }
    }

    #[test]
    fn test_role_unknown_is_pending() {
        assert_eq!(Role::parse("superuser"), Role::Pending);
        assert_eq!(Role::parse(""), Role::Pending);
    }

    #[test]
    fn test_permission_round_trip() {
        assert_eq!(Permission::parse("read"), Permission::Read);
        assert_eq!(Permission::parse("edit"), Permission::Edit);
    }

    #[test]
    fn test_permission_unknown_is_read() {
        assert_eq!(Permission::parse("write"), Permission::Read);
        assert_eq!(Permission::parse(""), Permission::Read);
    }

    #[test]
    fn test_permission_allows_write() {
        assert!(Permission::Edit.allows_write());
        assert!(!Permission::Read.allows_write());
    }
}
