//! Access-control configuration.
//!
//! Loaded by the host as part of its own config (e.g. `ACCESS__ROLE_SOURCE`,
//! `ACCESS__PRIVILEGED_ROLES` with the `__` separator).

use crate::resolver::AccessResolver;
use crate::role::RequiredRoles;
use crate::source::{EmployeeDirectory, RoleSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role sources that can be selected from configuration.
///
/// A policy provider is code, not config; hosts install it with
/// [`RoleSource::Policy`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSourceKind {
    /// Roles only from the account's legacy column.
    Column,
    /// Roles from the linked employee's role record.
    #[default]
    Employee,
}

/// Access-control settings.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Which role source to resolve through.
    /// Default: "employee"
    #[serde(default)]
    role_source: RoleSourceKind,
    /// Roles that see every employee's records, comma-separated.
    /// Default: "Admin,HR Manager"
    #[serde(default = "default_privileged_roles")]
    privileged_roles: String,
}

fn default_privileged_roles() -> String {
    "Admin,HR Manager".to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            role_source: RoleSourceKind::default(),
            privileged_roles: default_privileged_roles(),
        }
    }
}

impl AccessConfig {
    #[must_use]
    pub fn new(role_source: RoleSourceKind, privileged_roles: impl Into<String>) -> Self {
        Self {
            role_source,
            privileged_roles: privileged_roles.into(),
        }
    }

    #[must_use]
    pub fn role_source_kind(&self) -> RoleSourceKind {
        self.role_source
    }

    /// Returns the privileged roles, parsed.
    #[must_use]
    pub fn privileged_roles(&self) -> RequiredRoles {
        RequiredRoles::from(self.privileged_roles.as_str())
    }

    /// Builds the configured role source over `directory`.
    #[must_use]
    pub fn role_source(&self, directory: Arc<dyn EmployeeDirectory>) -> RoleSource {
        match self.role_source {
            RoleSourceKind::Column => RoleSource::LegacyColumn,
            RoleSourceKind::Employee => RoleSource::EmployeeRelation(directory),
        }
    }

    /// Builds a resolver for the configured role source.
    #[must_use]
    pub fn resolver(&self, directory: Arc<dyn EmployeeDirectory>) -> AccessResolver {
        AccessResolver::new(self.role_source(directory))
    }
}
