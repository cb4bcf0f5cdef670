//! Row-level scoping for per-employee records.
//!
//! Leave requests and presences belong to an employee. Privileged roles see
//! and file records for anyone; everyone else is confined to their own
//! employee id.

use crate::auth::AuthContext;
use crate::error::AccessError;
use crate::resolver::AccessResolver;
use crate::role::RequiredRoles;
use hrdesk_core::EmployeeId;
use rootcause::prelude::Report;
use serde::Serialize;

/// Which employees' records the current principal may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "employee_id", rename_all = "snake_case")]
pub enum RecordScope {
    /// Every employee (privileged role).
    All,
    /// Only this employee's records.
    Employee(EmployeeId),
    /// Not privileged and not linked to an employee.
    Nothing,
}

impl RecordScope {
    /// Computes the scope for the request.
    ///
    /// The own-employee id comes from the session cache when present,
    /// otherwise from the principal's employee link.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Unauthenticated` if the context has no principal.
    pub fn for_context(
        resolver: &AccessResolver,
        ctx: &mut AuthContext,
        privileged: &RequiredRoles,
    ) -> Result<Self, Report<AccessError>> {
        let Some(principal) = ctx.principal() else {
            return Err(AccessError::Unauthenticated.into());
        };
        let linked = principal.employee_id();

        if resolver.has_any_role(ctx, privileged) {
            return Ok(Self::All);
        }

        Ok(match ctx.cache.employee_id().or(linked) {
            Some(employee_id) => Self::Employee(employee_id),
            None => Self::Nothing,
        })
    }

    #[must_use]
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns true if a record owned by `employee_id` is visible.
    #[must_use]
    pub fn permits(&self, employee_id: EmployeeId) -> bool {
        match self {
            Self::All => true,
            Self::Employee(own) => *own == employee_id,
            Self::Nothing => false,
        }
    }

    /// The employee a new record is filed under.
    ///
    /// Privileged callers choose; everyone else files for themselves
    /// regardless of what they asked for.
    #[must_use]
    pub fn submission_owner(&self, requested: Option<EmployeeId>) -> Option<EmployeeId> {
        match self {
            Self::All => requested,
            Self::Employee(own) => Some(*own),
            Self::Nothing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use crate::principal::{Employee, Principal};
    use crate::role::Role;
    use crate::session::RoleCache;
    use crate::source::RoleSource;
    use std::sync::Arc;

    fn privileged() -> RequiredRoles {
        RequiredRoles::from("Admin,HR Manager")
    }

    fn setup(title: &str) -> (AccessResolver, Principal, EmployeeId) {
        let directory = MemoryDirectory::new();
        let role = Role::new(title);
        let employee = Employee::new("Ivan Moe").with_role(role.id());
        let principal = Principal::new("ivan").with_employee(employee.id());
        let employee_id = employee.id();
        directory.insert_role(role);
        directory.insert_employee(employee);
        let resolver = AccessResolver::new(RoleSource::EmployeeRelation(Arc::new(directory)));
        (resolver, principal, employee_id)
    }

    #[test]
    fn privileged_role_sees_everything() {
        let (resolver, principal, _) = setup("HR Manager");
        let mut ctx = AuthContext::authenticated(principal, RoleCache::empty());

        let scope = RecordScope::for_context(&resolver, &mut ctx, &privileged()).expect("scope");
        assert_eq!(scope, RecordScope::All);
        assert!(scope.is_privileged());
        assert!(scope.permits(EmployeeId::new()));

        let other = EmployeeId::new();
        assert_eq!(scope.submission_owner(Some(other)), Some(other));
    }

    #[test]
    fn employee_is_confined_to_own_records() {
        let (resolver, principal, own) = setup("Developer");
        let mut ctx = AuthContext::authenticated(principal, RoleCache::empty());

        let scope = RecordScope::for_context(&resolver, &mut ctx, &privileged()).expect("scope");
        assert_eq!(scope, RecordScope::Employee(own));
        assert!(scope.permits(own));
        assert!(!scope.permits(EmployeeId::new()));
        assert_eq!(scope.submission_owner(Some(EmployeeId::new())), Some(own));
    }

    #[test]
    fn unlinked_principal_sees_nothing() {
        let resolver = AccessResolver::new(RoleSource::LegacyColumn);
        let principal = Principal::new("temp").with_legacy_role("Animator");
        let mut ctx = AuthContext::authenticated(principal, RoleCache::empty());

        let scope = RecordScope::for_context(&resolver, &mut ctx, &privileged()).expect("scope");
        assert_eq!(scope, RecordScope::Nothing);
        assert!(!scope.permits(EmployeeId::new()));
        assert_eq!(scope.submission_owner(Some(EmployeeId::new())), None);
    }

    #[test]
    fn anonymous_context_is_rejected() {
        let resolver = AccessResolver::new(RoleSource::LegacyColumn);
        let err = RecordScope::for_context(&resolver, &mut AuthContext::anonymous(), &privileged())
            .expect_err("nobody is logged in");
        assert_eq!(err.current_context(), &AccessError::Unauthenticated);
    }

    #[test]
    fn scope_serializes_with_tag() {
        let json = serde_json::to_value(RecordScope::All).expect("serialize");
        assert_eq!(json, serde_json::json!({"scope": "all"}));
    }
}
