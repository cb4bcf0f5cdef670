//! Request-scoped authentication context and authorization outcomes.
//!
//! [`AuthContext`] is what every authorization call receives: the principal
//! (if anyone is logged in) and the session's [`RoleCache`]. The resolver
//! may write to the cache; the caller persists it back to the session.

use crate::principal::Principal;
use crate::role::RequiredRoles;
use crate::session::RoleCache;
use hrdesk_core::UserId;
use std::fmt;

/// The principal and session role cache for one request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    principal: Option<Principal>,
    /// Cached `role` / `employee_id` session keys.
    pub cache: RoleCache,
}

impl AuthContext {
    /// Context for an authenticated principal.
    #[must_use]
    pub fn authenticated(principal: Principal, cache: RoleCache) -> Self {
        Self {
            principal: Some(principal),
            cache,
        }
    }

    /// Context for a request with nobody logged in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Splits the context so the cache can be written while the principal is borrowed.
    pub(crate) fn parts_mut(&mut self) -> (Option<&Principal>, &mut RoleCache) {
        (self.principal.as_ref(), &mut self.cache)
    }

    /// Consumes the context, returning the cache to persist.
    #[must_use]
    pub fn into_cache(self) -> RoleCache {
        self.cache
    }
}

/// Where an effective role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOrigin {
    /// The session role cache.
    Session,
    /// The configured role source (employee relation or policy provider).
    Provider,
    /// The principal's legacy role column.
    LegacyColumn,
}

impl fmt::Display for RoleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Session => "session",
            Self::Provider => "provider",
            Self::LegacyColumn => "legacy_column",
        };
        f.write_str(s)
    }
}

/// A resolved effective role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    name: String,
    origin: RoleOrigin,
}

impl ResolvedRole {
    #[must_use]
    pub fn new(name: impl Into<String>, origin: RoleOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    /// The role name as stored at its origin.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn origin(&self) -> RoleOrigin {
        self.origin
    }
}

/// Why a request was allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The route declares no required roles.
    Open,
    /// The effective role is among the required roles.
    Granted(ResolvedRole),
    /// The policy provider confirmed membership in this required role.
    GrantedByPolicy(String),
}

/// The request being authorized, for audit records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    method: String,
    path: String,
    route: Option<String>,
}

impl RequestTarget {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            route: None,
        }
    }

    /// Attaches the matched route pattern or route name.
    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Everything an audit log needs about a refused request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    principal_id: UserId,
    resolved_role: Option<String>,
    required: RequiredRoles,
    target: RequestTarget,
}

impl Denial {
    #[must_use]
    pub fn new(
        principal_id: UserId,
        resolved_role: Option<String>,
        required: RequiredRoles,
        target: RequestTarget,
    ) -> Self {
        Self {
            principal_id,
            resolved_role,
            required,
            target,
        }
    }

    #[must_use]
    pub fn principal_id(&self) -> UserId {
        self.principal_id
    }

    #[must_use]
    pub fn resolved_role(&self) -> Option<&str> {
        self.resolved_role.as_deref()
    }

    #[must_use]
    pub fn required(&self) -> &RequiredRoles {
        &self.required
    }

    #[must_use]
    pub fn target(&self) -> &RequestTarget {
        &self.target
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user {} with role {} lacks one of [{}] for {}",
            self.principal_id,
            self.resolved_role.as_deref().unwrap_or("<none>"),
            self.required,
            self.target
        )
    }
}
