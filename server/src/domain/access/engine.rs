//! Access control engine
//!
//! The engine owns every authorization decision and the admin approval
//! workflow. It never trusts a caller-supplied role: each decision resolves
//! the principal from storage, takes one snapshot, and evaluates against it.
//! Nothing is cached across calls, so a link or role mutation is visible to
//! the very next decision.

use sqlx::SqlitePool;

use super::error::{AccessError, DenyReason, Operation};
use super::snapshot::{AccessSnapshot, Visibility};
use crate::data::sqlite::repositories::{link, profile, user};
use crate::data::types::{LinkRow, Permission, Role, UserRow};

/// A profile grant handed to the approval workflow
#[derive(Debug, Clone)]
pub struct LinkGrant {
    pub profile_id: String,
    pub permission: Permission,
}

/// Access control engine over an injected pool
#[derive(Clone)]
pub struct AccessEngine {
    pool: SqlitePool,
}

impl AccessEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a principal and its links in one consistent snapshot.
    ///
    /// Role is fetched first and never re-queried within the call; links for
    /// admins are skipped entirely since they cannot affect the outcome.
    pub async fn snapshot(&self, principal_id: &str) -> Result<AccessSnapshot, AccessError> {
        let principal = user::get_user(&self.pool, principal_id)
            .await?
            .ok_or_else(|| AccessError::Unauthenticated(principal_id.to_string()))?;

        let links = if Role::parse(&principal.role) == Role::Admin {
            Vec::new()
        } else {
            link::list_links_for_user(&self.pool, principal_id).await?
        };

        Ok(AccessSnapshot::new(principal, links))
    }

    /// The set of profiles the principal may read
    pub async fn list_visible_profiles(
        &self,
        principal_id: &str,
    ) -> Result<Visibility, AccessError> {
        Ok(self.snapshot(principal_id).await?.visible_profiles())
    }

    /// Require read access to a profile
    pub async fn require_read(
        &self,
        principal_id: &str,
        profile_id: &str,
    ) -> Result<(), AccessError> {
        self.snapshot(principal_id)
            .await?
            .check(profile_id, Operation::Read)
    }

    /// Require write access to a profile for a specific mutating operation
    pub async fn require_write(
        &self,
        principal_id: &str,
        profile_id: &str,
        operation: Operation,
    ) -> Result<(), AccessError> {
        self.snapshot(principal_id)
            .await?
            .check(profile_id, operation)
    }

    /// Require the admin role, returning the admin's row
    pub async fn require_admin(&self, principal_id: &str) -> Result<UserRow, AccessError> {
        let snapshot = self.snapshot(principal_id).await?;
        if !snapshot.can_manage() {
            return Err(AccessError::denied_manage(DenyReason::NoAccess));
        }
        Ok(snapshot.principal().clone())
    }

    /// Approve a principal: set its role with audit fields and upsert the
    /// given grants. Zero grants is valid; the principal simply has no
    /// profile access until links are edited later. Re-running on an
    /// already-approved principal updates the grant set.
    pub async fn approve_principal(
        &self,
        admin_id: &str,
        target_id: &str,
        new_role: Role,
        grants: &[LinkGrant],
    ) -> Result<UserRow, AccessError> {
        let admin = self.require_admin(admin_id).await?;

        let target = user::get_user(&self.pool, target_id)
            .await?
            .ok_or_else(|| AccessError::PrincipalNotFound(target_id.to_string()))?;

        let current = Role::parse(&target.role);
        // Rejected principals are immutable except for removal, and the
        // workflow only ever moves principals into approved or admin
        if current == Role::Rejected || !matches!(new_role, Role::Approved | Role::Admin) {
            return Err(AccessError::InvalidTransition {
                from: current,
                to: new_role,
            });
        }

        self.require_profiles_exist(grants).await?;

        let updated = user::approve_user(&self.pool, target_id, new_role.as_str(), &admin.id)
            .await?
            .ok_or_else(|| AccessError::PrincipalNotFound(target_id.to_string()))?;

        for grant in grants {
            link::upsert_link(
                &self.pool,
                target_id,
                &grant.profile_id,
                grant.permission.as_str(),
            )
            .await?;
        }

        tracing::info!(
            target = %target_id,
            role = %new_role,
            grants = grants.len(),
            approved_by = %admin.id,
            "Principal approved"
        );

        Ok(updated)
    }

    /// Reject a principal: the record is deleted outright, cascading links
    pub async fn reject_principal(
        &self,
        admin_id: &str,
        target_id: &str,
    ) -> Result<(), AccessError> {
        let admin = self.require_admin(admin_id).await?;

        if !user::delete_user(&self.pool, target_id).await? {
            return Err(AccessError::PrincipalNotFound(target_id.to_string()));
        }

        tracing::info!(target = %target_id, rejected_by = %admin.id, "Principal rejected");
        Ok(())
    }

    /// Granting against a missing profile is a caller error, not an FK blowup
    async fn require_profiles_exist(&self, grants: &[LinkGrant]) -> Result<(), AccessError> {
        for grant in grants {
            if profile::get_profile(&self.pool, &grant.profile_id)
                .await?
                .is_none()
            {
                return Err(AccessError::ProfileNotFound(grant.profile_id.clone()));
            }
        }
        Ok(())
    }

    /// Replace a principal's entire grant set (admin permission editing)
    pub async fn replace_links(
        &self,
        admin_id: &str,
        target_id: &str,
        grants: &[LinkGrant],
    ) -> Result<Vec<LinkRow>, AccessError> {
        self.require_admin(admin_id).await?;

        if user::get_user(&self.pool, target_id).await?.is_none() {
            return Err(AccessError::PrincipalNotFound(target_id.to_string()));
        }
        self.require_profiles_exist(grants).await?;

        let pairs: Vec<(String, String)> = grants
            .iter()
            .map(|g| (g.profile_id.clone(), g.permission.as_str().to_string()))
            .collect();

        Ok(link::replace_links_for_user(&self.pool, target_id, &pairs).await?)
    }
}
