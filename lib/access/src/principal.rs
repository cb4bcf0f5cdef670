//! Principals and the employee records they may be linked to.
//!
//! A principal is a login account. It may carry a legacy role string from
//! before roles moved onto employees, and it may point at an employee
//! record whose role is the authoritative one.

use hrdesk_core::{EmployeeId, RoleId, UserId};
use serde::{Deserialize, Serialize};

/// An authenticated actor making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: UserId,
    /// Account name, shown when no employee record is linked.
    name: String,
    #[serde(default)]
    email: Option<String>,
    /// Legacy single-role column.
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    employee_id: Option<EmployeeId>,
}

impl Principal {
    /// Creates a principal with a fresh ID and no role information.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: None,
            role: None,
            employee_id: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the legacy role column.
    #[must_use]
    pub fn with_legacy_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Links the principal to an employee record.
    #[must_use]
    pub fn with_employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the legacy role column, if set.
    #[must_use]
    pub fn legacy_role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    #[must_use]
    pub fn employee_id(&self) -> Option<EmployeeId> {
        self.employee_id
    }

    /// Sets the legacy role column (seeding and development accounts).
    pub fn set_legacy_role(&mut self, role: Option<String>) {
        self.role = role;
    }

    /// Returns the employee's full name when one is linked and non-blank,
    /// otherwise the account name.
    #[must_use]
    pub fn display_name<'a>(&'a self, employee: Option<&'a Employee>) -> &'a str {
        employee
            .map(|e| e.fullname().trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(self.name.as_str())
    }
}

/// An employee record, as far as access control cares about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    fullname: String,
    #[serde(default)]
    role_id: Option<RoleId>,
}

impl Employee {
    /// Creates an employee with a fresh ID and no role.
    #[must_use]
    pub fn new(fullname: impl Into<String>) -> Self {
        Self {
            id: EmployeeId::new(),
            fullname: fullname.into(),
            role_id: None,
        }
    }

    /// Assigns the employee's role.
    #[must_use]
    pub fn with_role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    #[must_use]
    pub fn id(&self) -> EmployeeId {
        self.id
    }

    #[must_use]
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        self.role_id
    }
}
