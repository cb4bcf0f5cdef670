//! In-memory directory of accounts, employees and roles.
//!
//! Backs both [`PrincipalDirectory`] and [`EmployeeDirectory`] for hosts that
//! load their records from a seed file rather than a database.

use crate::error::LookupError;
use crate::principal::{Employee, Principal};
use crate::role::Role;
use crate::source::{EmployeeDirectory, EmployeeRole, PrincipalDirectory};
use hrdesk_core::{EmployeeId, RoleId, UserId};
use rootcause::prelude::Report;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

/// Records to preload into a [`MemoryDirectory`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub users: Vec<Principal>,
}

#[derive(Debug, Default)]
struct Records {
    roles: HashMap<RoleId, Role>,
    employees: HashMap<EmployeeId, Employee>,
    principals: HashMap<UserId, Principal>,
}

/// Thread-safe in-memory directory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    records: RwLock<Records>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from seed records.
    #[must_use]
    pub fn from_seed(seed: DirectorySeed) -> Self {
        let directory = Self::new();
        for role in seed.roles {
            directory.insert_role(role);
        }
        for employee in seed.employees {
            directory.insert_employee(employee);
        }
        for principal in seed.users {
            directory.insert_principal(principal);
        }
        directory
    }

    pub fn insert_role(&self, role: Role) {
        self.write().roles.insert(role.id(), role);
    }

    pub fn insert_employee(&self, employee: Employee) {
        self.write().employees.insert(employee.id(), employee);
    }

    pub fn insert_principal(&self, principal: Principal) {
        self.write().principals.insert(principal.id(), principal);
    }

    /// Returns an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the directory lock is poisoned.
    pub fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, Report<LookupError>> {
        Ok(self.read()?.employees.get(&id).cloned())
    }

    /// Returns every employee, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the directory lock is poisoned.
    pub fn employees(&self) -> Result<Vec<Employee>, Report<LookupError>> {
        let mut employees: Vec<Employee> = self.read()?.employees.values().cloned().collect();
        employees.sort_by_key(Employee::id);
        Ok(employees)
    }

    /// Number of (roles, employees, principals) held.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        match self.records.read() {
            Ok(records) => (
                records.roles.len(),
                records.employees.len(),
                records.principals.len(),
            ),
            Err(_) => (0, 0, 0),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, Report<LookupError>> {
        self.records.read().map_err(|e| {
            LookupError::Unavailable {
                source: "memory_directory".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Records> {
        // Inserts are single map operations, so poisoned data is still consistent.
        self.records
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl EmployeeDirectory for MemoryDirectory {
    fn employee_role(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<EmployeeRole>, Report<LookupError>> {
        let records = self.read()?;
        let Some(employee) = records.employees.get(&employee_id) else {
            return Ok(None);
        };

        let role = match employee.role_id() {
            None => None,
            Some(role_id) => match records.roles.get(&role_id) {
                Some(role) => Some(role.clone()),
                None => {
                    return Err(LookupError::DanglingRole {
                        employee_id,
                        role_id,
                    }
                    .into());
                }
            },
        };

        Ok(Some(EmployeeRole {
            employee: employee.clone(),
            role,
        }))
    }
}

impl PrincipalDirectory for MemoryDirectory {
    fn principal(&self, user_id: UserId) -> Result<Option<Principal>, Report<LookupError>> {
        Ok(self.read()?.principals.get(&user_id).cloned())
    }
}
