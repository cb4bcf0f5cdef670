//! Where a principal's role comes from when the session has none cached.
//!
//! The source is picked once at startup. Each variant is a different
//! deployment shape:
//! - `LegacyColumn`: accounts carry their own role string, no employee link
//! - `EmployeeRelation`: account → employee → role title, read through an
//!   [`EmployeeDirectory`]
//! - `Policy`: an external provider that both names the role and answers
//!   membership questions

use crate::error::LookupError;
use crate::principal::{Employee, Principal};
use crate::role::{Role, RoleName};
use hrdesk_core::{EmployeeId, UserId};
use rootcause::prelude::Report;
use std::fmt;
use std::sync::Arc;

/// An employee together with its role, read in one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRole {
    pub employee: Employee,
    pub role: Option<Role>,
}

/// Read access to the employee → role association.
pub trait EmployeeDirectory: Send + Sync {
    /// Returns the employee and its role, or `None` if no such employee exists.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the store fails or the relation is broken.
    fn employee_role(
        &self,
        employee_id: EmployeeId,
    ) -> hrdesk_core::Result<Option<EmployeeRole>, LookupError>;
}

/// Looks up the principal behind an authenticated session.
pub trait PrincipalDirectory: Send + Sync {
    /// Returns the principal, or `None` if the account no longer exists.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the store fails.
    fn principal(&self, user_id: UserId) -> hrdesk_core::Result<Option<Principal>, LookupError>;
}

/// An external role provider.
pub trait RolePolicy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// The principal's role name according to the provider.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the provider cannot be reached.
    fn role_of(&self, principal: &Principal) -> hrdesk_core::Result<Option<String>, LookupError>;

    /// Whether the principal holds `role` according to the provider.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the provider cannot be reached.
    fn has_role(&self, principal: &Principal, role: &RoleName)
    -> hrdesk_core::Result<bool, LookupError>;
}

/// A role supplied by the configured source, plus the employee it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedRole {
    pub name: String,
    pub employee_id: Option<EmployeeId>,
}

/// The configured role source.
#[derive(Clone)]
pub enum RoleSource {
    LegacyColumn,
    EmployeeRelation(Arc<dyn EmployeeDirectory>),
    Policy(Arc<dyn RolePolicy>),
}

impl RoleSource {
    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::LegacyColumn => "legacy_column",
            Self::EmployeeRelation(_) => "employee_relation",
            Self::Policy(policy) => policy.name(),
        }
    }

    /// Returns the policy provider, if this source is one.
    #[must_use]
    pub fn policy(&self) -> Option<&dyn RolePolicy> {
        match self {
            Self::Policy(policy) => Some(policy.as_ref()),
            _ => None,
        }
    }

    /// Reads the principal's role from this source.
    ///
    /// Blank role names read as `None`. The legacy column is not consulted
    /// here; the resolver falls back to it separately.
    ///
    /// # Errors
    ///
    /// Propagates the source's `LookupError`.
    pub fn linked_role(
        &self,
        principal: &Principal,
    ) -> Result<Option<ProvidedRole>, Report<LookupError>> {
        let provided = match self {
            Self::LegacyColumn => None,
            Self::EmployeeRelation(directory) => {
                let Some(employee_id) = principal.employee_id() else {
                    return Ok(None);
                };
                directory
                    .employee_role(employee_id)?
                    .and_then(|EmployeeRole { employee, role }| {
                        role.map(|role| ProvidedRole {
                            name: role.title().to_string(),
                            employee_id: Some(employee.id()),
                        })
                    })
            }
            Self::Policy(policy) => policy.role_of(principal)?.map(|name| ProvidedRole {
                name,
                employee_id: principal.employee_id(),
            }),
        };

        Ok(provided.filter(|p| !p.name.trim().is_empty()))
    }
}

impl fmt::Debug for RoleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoleSource").field(&self.label()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;

    fn directory_with(employee: Employee, role: Option<Role>) -> Arc<MemoryDirectory> {
        let directory = MemoryDirectory::new();
        if let Some(role) = role {
            directory.insert_role(role);
        }
        directory.insert_employee(employee);
        Arc::new(directory)
    }

    #[test]
    fn legacy_column_source_provides_nothing() {
        let principal = Principal::new("alice").with_legacy_role("Admin");
        let provided = RoleSource::LegacyColumn
            .linked_role(&principal)
            .expect("no lookup");
        assert!(provided.is_none());
    }

    #[test]
    fn employee_relation_reads_role_title() {
        let role = Role::new("HR Manager");
        let employee = Employee::new("Alice Doe").with_role(role.id());
        let principal = Principal::new("alice").with_employee(employee.id());
        let source = RoleSource::EmployeeRelation(directory_with(employee.clone(), Some(role)));

        let provided = source
            .linked_role(&principal)
            .expect("lookup succeeds")
            .expect("role linked");
        assert_eq!(provided.name, "HR Manager");
        assert_eq!(provided.employee_id, Some(employee.id()));
    }

    #[test]
    fn employee_relation_without_link_skips_lookup() {
        let source = RoleSource::EmployeeRelation(Arc::new(MemoryDirectory::new()));
        let provided = source
            .linked_role(&Principal::new("bob"))
            .expect("no lookup");
        assert!(provided.is_none());
    }

    #[test]
    fn employee_without_role_provides_nothing() {
        let employee = Employee::new("Bob Roe");
        let principal = Principal::new("bob").with_employee(employee.id());
        let source = RoleSource::EmployeeRelation(directory_with(employee, None));
        assert!(source.linked_role(&principal).expect("lookup").is_none());
    }

    #[test]
    fn blank_role_title_provides_nothing() {
        let role = Role::new("  ");
        let employee = Employee::new("Bob Roe").with_role(role.id());
        let principal = Principal::new("bob").with_employee(employee.id());
        let source = RoleSource::EmployeeRelation(directory_with(employee, Some(role)));
        assert!(source.linked_role(&principal).expect("lookup").is_none());
    }

    #[test]
    fn debug_shows_label_only() {
        let source = RoleSource::EmployeeRelation(Arc::new(MemoryDirectory::new()));
        assert_eq!(format!("{source:?}"), "RoleSource(\"employee_relation\")");
        assert!(source.policy().is_none());
    }
}
