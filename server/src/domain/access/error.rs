//! Access control error types
//!
//! Every denial is a first-class outcome carrying the profile and operation
//! it applies to. Mutating paths never collapse a denial into an empty
//! result; only reads may return an empty visible set instead of an error.

use std::fmt;

use thiserror::Error;

use crate::data::SqliteError;
use crate::data::types::Role;

/// The operation a decision applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Insert,
    Update,
    Delete,
    Manage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a permission check failed. `ReadOnly` is kept distinct so the API can
/// tell "no access at all" apart from "read-only access, edit denied".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No link at all (or not the admin the operation requires)
    NoAccess,
    /// A read link exists but the operation mutates
    ReadOnly,
    /// The principal is still pending or was rejected
    NotApproved,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoAccess => "no access",
            Self::ReadOnly => "read-only access",
            Self::NotApproved => "account not approved",
        };
        f.write_str(s)
    }
}

/// Access control failure
#[derive(Error, Debug)]
pub enum AccessError {
    /// No resolvable principal behind the request
    #[error("No resolvable principal: {0}")]
    Unauthenticated(String),

    /// Resolvable principal, insufficient role or link
    #[error("{operation} denied{}: {reason}", .profile_id.as_deref().map(|p| format!(" on profile {}", p)).unwrap_or_default())]
    PermissionDenied {
        profile_id: Option<String>,
        operation: Operation,
        reason: DenyReason,
    },

    /// A referenced principal does not exist
    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    /// A referenced profile does not exist
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// The approval workflow does not define this role change
    #[error("Invalid role transition: {from} -> {to}")]
    InvalidTransition { from: Role, to: Role },

    #[error(transparent)]
    Storage(#[from] SqliteError),
}

impl AccessError {
    pub fn denied(profile_id: &str, operation: Operation, reason: DenyReason) -> Self {
        Self::PermissionDenied {
            profile_id: Some(profile_id.to_string()),
            operation,
            reason,
        }
    }

    pub fn denied_manage(reason: DenyReason) -> Self {
        Self::PermissionDenied {
            profile_id: None,
            operation: Operation::Manage,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_display_names_profile_and_operation() {
        let err = AccessError::denied("prof-1", Operation::Update, DenyReason::ReadOnly);
        let msg = err.to_string();
        assert!(msg.contains("update"));
        assert!(msg.contains("prof-1"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_denied_manage_display_has_no_profile() {
        let err = AccessError::denied_manage(DenyReason::NoAccess);
        assert_eq!(err.to_string(), "manage denied: no access");
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = AccessError::InvalidTransition {
            from: Role::Rejected,
            to: Role::Approved,
        };
        assert_eq!(err.to_string(), "Invalid role transition: rejected -> approved");
    }
}
