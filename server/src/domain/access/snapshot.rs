//! Per-call authorization snapshot
//!
//! A snapshot is taken once per decision: the principal's role is resolved
//! first and treated as authoritative for the rest of the call, then links
//! are attached. Decisions are pure functions of the snapshot, so a role or
//! link change between two calls can never leak into a half-made decision.

use std::collections::{BTreeSet, HashMap};

use super::error::{AccessError, DenyReason, Operation};
use crate::data::types::{LinkRow, Permission, Role, UserRow};

/// The set of profiles a principal may read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Admins see every profile
    All,
    /// Non-admins see exactly their linked profiles
    Profiles(BTreeSet<String>),
}

impl Visibility {
    pub fn contains(&self, profile_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Profiles(set) => set.contains(profile_id),
        }
    }

    /// Intersect a caller-requested id list with this visibility.
    /// Ids outside the visible set are silently dropped, not rejected.
    pub fn intersect(&self, requested: &[String]) -> Vec<String> {
        requested
            .iter()
            .filter(|id| self.contains(id))
            .cloned()
            .collect()
    }
}

/// A principal plus its links, resolved at a single point in time
#[derive(Debug, Clone)]
pub struct AccessSnapshot {
    principal: UserRow,
    role: Role,
    links: HashMap<String, Permission>,
}

impl AccessSnapshot {
    pub fn new(principal: UserRow, links: Vec<LinkRow>) -> Self {
        let role = Role::parse(&principal.role);

        // Duplicate grants are collapsed with edit winning; the schema
        // prevents them, but the engine must not rely on that
        let mut map: HashMap<String, Permission> = HashMap::new();
        for link in links {
            let permission = Permission::parse(&link.permission);
            map.entry(link.profile_id)
                .and_modify(|existing| {
                    if permission.allows_write() {
                        *existing = permission;
                    }
                })
                .or_insert(permission);
        }

        Self {
            principal,
            role,
            links: map,
        }
    }

    pub fn principal(&self) -> &UserRow {
        &self.principal
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Manage covers profile rename/delete and the approval workflow
    pub fn can_manage(&self) -> bool {
        self.is_admin()
    }

    /// Admins and approved users may create profiles
    pub fn can_create_profiles(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Approved)
    }

    /// The visible profile set. A non-admin with no links gets the empty
    /// set, which is a valid result, not an error.
    pub fn visible_profiles(&self) -> Visibility {
        if self.is_admin() {
            Visibility::All
        } else {
            Visibility::Profiles(self.links.keys().cloned().collect())
        }
    }

    pub fn can_read(&self, profile_id: &str) -> bool {
        self.is_admin() || self.links.contains_key(profile_id)
    }

    pub fn can_write(&self, profile_id: &str) -> bool {
        self.is_admin()
            || self
                .links
                .get(profile_id)
                .is_some_and(|p| p.allows_write())
    }

    /// Evaluate an operation against a profile, producing a typed denial
    pub fn check(&self, profile_id: &str, operation: Operation) -> Result<(), AccessError> {
        if self.is_admin() {
            return Ok(());
        }

        match operation {
            Operation::Read => {
                if self.links.contains_key(profile_id) {
                    Ok(())
                } else {
                    Err(AccessError::denied(
                        profile_id,
                        operation,
                        DenyReason::NoAccess,
                    ))
                }
            }
            Operation::Insert | Operation::Update | Operation::Delete => {
                match self.links.get(profile_id) {
                    Some(permission) if permission.allows_write() => Ok(()),
                    Some(_) => Err(AccessError::denied(
                        profile_id,
                        operation,
                        DenyReason::ReadOnly,
                    )),
                    None => Err(AccessError::denied(
                        profile_id,
                        operation,
                        DenyReason::NoAccess,
                    )),
                }
            }
            Operation::Manage => Err(AccessError::denied_manage(DenyReason::NoAccess)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> UserRow {
        UserRow {
            id: "u1".to_string(),
            subject: "idp|u1".to_string(),
            email: None,
            role: role.to_string(),
            approved_at: None,
            approved_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn link(profile_id: &str, permission: &str) -> LinkRow {
        LinkRow {
            id: cuid2::create_id(),
            user_id: "u1".to_string(),
            profile_id: profile_id.to_string(),
            permission: permission.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_admin_sees_everything() {
        let snapshot = AccessSnapshot::new(user("admin"), vec![]);
        assert_eq!(snapshot.visible_profiles(), Visibility::All);
        assert!(snapshot.can_read("anything"));
        assert!(snapshot.can_write("anything"));
        assert!(snapshot.can_manage());
    }

    #[test]
    fn test_visibility_is_exactly_the_link_set() {
        let snapshot = AccessSnapshot::new(
            user("approved"),
            vec![link("p1", "read"), link("p2", "edit")],
        );

        let expected: BTreeSet<String> = ["p1", "p2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(snapshot.visible_profiles(), Visibility::Profiles(expected));
        assert!(!snapshot.can_read("p3"));
    }

    #[test]
    fn test_no_links_is_empty_set_not_error() {
        let snapshot = AccessSnapshot::new(user("approved"), vec![]);
        match snapshot.visible_profiles() {
            Visibility::Profiles(set) => assert!(set.is_empty()),
            Visibility::All => panic!("approved user must not see all"),
        }
    }

    #[test]
    fn test_duplicate_links_collapse_with_edit_winning() {
        let snapshot = AccessSnapshot::new(
            user("approved"),
            vec![link("p1", "read"), link("p1", "edit"), link("p1", "read")],
        );
        assert!(snapshot.can_write("p1"));
        match snapshot.visible_profiles() {
            Visibility::Profiles(set) => assert_eq!(set.len(), 1),
            Visibility::All => unreachable!(),
        }
    }

    #[test]
    fn test_read_link_denies_writes_with_read_only_reason() {
        let snapshot = AccessSnapshot::new(user("approved"), vec![link("p1", "read")]);

        assert!(snapshot.can_read("p1"));
        assert!(!snapshot.can_write("p1"));

        for op in [Operation::Insert, Operation::Update, Operation::Delete] {
            let err = snapshot.check("p1", op).unwrap_err();
            match err {
                AccessError::PermissionDenied {
                    profile_id, reason, ..
                } => {
                    assert_eq!(profile_id.as_deref(), Some("p1"));
                    assert_eq!(reason, DenyReason::ReadOnly);
                }
                other => panic!("Unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_no_link_denies_with_no_access_reason() {
        let snapshot = AccessSnapshot::new(user("approved"), vec![]);

        let err = snapshot.check("p1", Operation::Read).unwrap_err();
        match err {
            AccessError::PermissionDenied { reason, .. } => {
                assert_eq!(reason, DenyReason::NoAccess)
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_edit_link_allows_all_entry_operations() {
        let snapshot = AccessSnapshot::new(user("approved"), vec![link("p1", "edit")]);
        for op in [
            Operation::Read,
            Operation::Insert,
            Operation::Update,
            Operation::Delete,
        ] {
            assert!(snapshot.check("p1", op).is_ok());
        }
    }

    #[test]
    fn test_links_never_grant_manage() {
        let snapshot = AccessSnapshot::new(user("approved"), vec![link("p1", "edit")]);
        assert!(snapshot.check("p1", Operation::Manage).is_err());
        assert!(!snapshot.can_manage());
    }

    #[test]
    fn test_pending_and_rejected_cannot_create_profiles() {
        assert!(AccessSnapshot::new(user("admin"), vec![]).can_create_profiles());
        assert!(AccessSnapshot::new(user("approved"), vec![]).can_create_profiles());
        assert!(!AccessSnapshot::new(user("pending"), vec![]).can_create_profiles());
        assert!(!AccessSnapshot::new(user("rejected"), vec![]).can_create_profiles());
    }

    #[test]
    fn test_unknown_role_degrades_to_pending() {
        let snapshot = AccessSnapshot::new(user("root"), vec![link("p1", "edit")]);
        assert_eq!(snapshot.role(), Role::Pending);
        assert!(!snapshot.can_manage());
        // Links still apply; role gates management, links gate data
        assert!(snapshot.can_read("p1"));
    }

    #[test]
    fn test_visibility_intersect_drops_foreign_ids() {
        let snapshot = AccessSnapshot::new(user("approved"), vec![link("p1", "read")]);
        let visibility = snapshot.visible_profiles();

        let requested = vec!["p1".to_string(), "p9".to_string()];
        assert_eq!(visibility.intersect(&requested), vec!["p1".to_string()]);

        assert_eq!(Visibility::All.intersect(&requested), requested);
    }
}
