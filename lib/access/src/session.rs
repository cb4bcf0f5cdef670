//! Sessions and the role cache they carry.
//!
//! A session ties a browser cookie to an authenticated principal. Alongside
//! the identity it holds a [`RoleCache`]: the effective role and employee id
//! resolved on an earlier request, so later requests can skip the
//! employee/role lookup. The cache is never validated against the current
//! employee record; it lives until logout, expiry, or an explicit clear.

use chrono::{DateTime, Duration, Utc};
use hrdesk_core::{EmployeeId, UserId};
use serde::{Deserialize, Serialize};

/// Unique identifier for a session.
///
/// Session IDs are opaque strings generated during session creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh random session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The `role` and `employee_id` session keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCache {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    employee_id: Option<EmployeeId>,
}

impl RoleCache {
    /// An empty cache.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cache pre-populated with a role, as a controller might leave it.
    #[must_use]
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            employee_id: None,
        }
    }

    /// Returns the cached role if it is present and not blank.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref().filter(|r| !r.trim().is_empty())
    }

    #[must_use]
    pub fn employee_id(&self) -> Option<EmployeeId> {
        self.employee_id
    }

    /// Stores a resolved role and the employee it came from.
    ///
    /// `employee_id` overwrites unconditionally, including with `None`.
    pub fn store(&mut self, role: impl Into<String>, employee_id: Option<EmployeeId>) {
        self.role = Some(role.into());
        self.employee_id = employee_id;
    }

    /// Forgets both keys.
    pub fn clear(&mut self) {
        self.role = None;
        self.employee_id = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.role().is_none() && self.employee_id.is_none()
    }
}

/// An active authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    /// Role resolved on an earlier request, if any.
    #[serde(default)]
    cache: RoleCache,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session for the given user, valid for `duration`.
    #[must_use]
    pub fn new(id: SessionId, user_id: UserId, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            cache: RoleCache::empty(),
            created_at: now,
            expires_at: now + duration,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn cache(&self) -> &RoleCache {
        &self.cache
    }

    /// Replaces the role cache with the state left by a resolution.
    pub fn set_cache(&mut self, cache: RoleCache) {
        self.cache = cache;
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the session is still valid (not expired).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }

    /// Extends the expiry to `duration` from now.
    pub fn touch(&mut self, duration: Duration) {
        self.expires_at = Utc::now() + duration;
    }
}
