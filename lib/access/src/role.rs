//! Role records and role-name matching.
//!
//! Role names come from several places (the roles table, the legacy column
//! on the account, the session cache, route declarations) and nobody agrees
//! on casing or whitespace. Every comparison therefore goes through
//! [`RoleName`], which trims and lower-cases once and compares on that key.

use hrdesk_core::RoleId;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A job role from the roles table (e.g. "Admin", "HR Manager").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    /// Human-readable name; this is what authorization compares against.
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl Role {
    /// Creates a role with a fresh ID.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            title: title.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Returns the comparison key for a role name: trimmed and lower-cased.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A non-blank role name that compares case- and whitespace-insensitively.
///
/// The trimmed original spelling is kept for display and logging.
#[derive(Debug, Clone)]
pub struct RoleName {
    display: String,
    key: String,
}

impl RoleName {
    /// Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn new(name: &str) -> Option<Self> {
        let display = name.trim();
        if display.is_empty() {
            return None;
        }
        Some(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    /// The trimmed name as originally spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The normalized comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true if `other` names the same role.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.key == normalize(other)
    }
}

impl PartialEq for RoleName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for RoleName {}

impl Hash for RoleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// The set of role names a route declares as sufficient for access.
///
/// Route declarations arrive either as one comma-separated parameter
/// (`"Admin,HR Manager"`) or as several discrete parameters; both parse to
/// the same set. Empty entries are dropped and duplicates (by normalized
/// name) collapse to their first spelling. An empty set means the route is
/// unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles {
    roles: Vec<RoleName>,
}

impl RequiredRoles {
    /// An empty requirement: any authenticated principal may pass.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses route parameters, splitting each on commas.
    #[must_use]
    pub fn parse<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roles: Vec<RoleName> = Vec::new();
        for param in params {
            for name in param.as_ref().split(',').filter_map(RoleName::new) {
                if !roles.contains(&name) {
                    roles.push(name);
                }
            }
        }
        Self { roles }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.iter()
    }

    /// Returns true if `role` matches any required role after normalization.
    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        let key = normalize(role);
        !key.is_empty() && self.roles.iter().any(|r| r.key() == key)
    }

    /// The normalized keys, for logging and set comparison.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.roles.iter().map(RoleName::key).collect()
    }

    /// The names as declared (trimmed, first spelling wins).
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.roles.iter().map(RoleName::as_str).collect()
    }
}

impl FromStr for RequiredRoles {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse([s]))
    }
}

impl From<&str> for RequiredRoles {
    fn from(s: &str) -> Self {
        Self::parse([s])
    }
}

impl fmt::Display for RequiredRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn key_set(roles: &RequiredRoles) -> BTreeSet<&str> {
        roles.keys().into_iter().collect()
    }

    #[test]
    fn role_name_rejects_blank() {
        assert!(RoleName::new("").is_none());
        assert!(RoleName::new("   ").is_none());
    }

    #[test]
    fn role_name_ignores_case_and_whitespace() {
        let admin = RoleName::new("Admin").expect("non-blank");
        assert!(admin.matches(" admin "));
        assert!(admin.matches("ADMIN"));
        assert!(admin.matches("Admin"));
        assert!(!admin.matches("Administrator"));
        assert_eq!(admin, RoleName::new("  aDmIn").expect("non-blank"));
    }

    #[test]
    fn role_name_keeps_trimmed_spelling() {
        let name = RoleName::new("  HR Manager ").expect("non-blank");
        assert_eq!(name.as_str(), "HR Manager");
        assert_eq!(name.key(), "hr manager");
        assert_eq!(name.to_string(), "HR Manager");
    }

    #[test]
    fn comma_list_and_discrete_values_are_equivalent() {
        let joined = RequiredRoles::parse(["Admin,HR Manager"]);
        let discrete = RequiredRoles::parse(["Admin", "HR Manager"]);

        assert_eq!(joined, discrete);
        assert_eq!(
            key_set(&joined),
            BTreeSet::from(["admin", "hr manager"])
        );
    }

    #[test]
    fn parse_drops_empty_entries_and_duplicates() {
        let roles = RequiredRoles::parse(["Admin,, ,admin", "", "HR Manager", " ADMIN "]);
        assert_eq!(roles.names(), vec!["Admin", "HR Manager"]);
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn parse_of_nothing_is_unrestricted() {
        assert!(RequiredRoles::parse(Vec::<String>::new()).is_empty());
        assert!(RequiredRoles::parse([",", " "]).is_empty());
        assert!(RequiredRoles::none().is_empty());
    }

    #[test]
    fn contains_normalizes_candidate() {
        let roles: RequiredRoles = "Admin, HR Manager".parse().expect("infallible");
        assert!(roles.contains(" hr manager"));
        assert!(roles.contains("ADMIN"));
        assert!(!roles.contains("Developer"));
        assert!(!roles.contains("  "));
    }

    #[test]
    fn display_joins_with_commas() {
        let roles = RequiredRoles::from(" Admin ,Accountant");
        assert_eq!(roles.to_string(), "Admin,Accountant");
    }

    #[test]
    fn role_record_accessors() {
        let role = Role::new("Developer").with_description("Builds and maintains software.");
        assert_eq!(role.title(), "Developer");
        assert_eq!(role.description(), Some("Builds and maintains software."));
        assert!(role.id().to_string().starts_with("role_"));
    }
}
