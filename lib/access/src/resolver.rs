//! Effective-role resolution and role-gated authorization.
//!
//! The effective role is the first non-blank answer from:
//! 1. the session role cache
//! 2. the configured [`RoleSource`] (written back to the cache on success)
//! 3. the principal's legacy role column
//!
//! The cache is trusted without re-checking the employee record. A failing
//! source lookup is logged and skipped; it never fails the request.

use crate::auth::{Access, AuthContext, Denial, RequestTarget, ResolvedRole, RoleOrigin};
use crate::error::AccessError;
use crate::principal::Principal;
use crate::role::RequiredRoles;
use crate::session::RoleCache;
use crate::source::RoleSource;
use rootcause::prelude::Report;
use tracing::{debug, instrument, warn};

/// Resolves effective roles and gates requests on required roles.
#[derive(Debug, Clone)]
pub struct AccessResolver {
    source: RoleSource,
}

impl AccessResolver {
    #[must_use]
    pub fn new(source: RoleSource) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn source(&self) -> &RoleSource {
        &self.source
    }

    /// Resolves the principal's effective role.
    ///
    /// Returns `Ok(None)` when no source yields a role.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Unauthenticated` if the context has no principal.
    pub fn resolve_effective_role(
        &self,
        ctx: &mut AuthContext,
    ) -> Result<Option<ResolvedRole>, Report<AccessError>> {
        let (principal, cache) = ctx.parts_mut();
        let principal = principal.ok_or(AccessError::Unauthenticated)?;
        Ok(self.resolve(principal, cache))
    }

    /// Decides whether the request may proceed.
    ///
    /// An empty `required` set allows any authenticated principal. The
    /// effective role is resolved before that check, so the cache write
    /// happens either way.
    ///
    /// # Errors
    ///
    /// - `AccessError::Unauthenticated` if the context has no principal
    /// - `AccessError::Forbidden` if the effective role is absent or not required
    #[instrument(skip_all, fields(required = %required, request = %target))]
    pub fn authorize(
        &self,
        ctx: &mut AuthContext,
        required: &RequiredRoles,
        target: &RequestTarget,
    ) -> Result<Access, Report<AccessError>> {
        let (principal, cache) = ctx.parts_mut();
        let principal = principal.ok_or(AccessError::Unauthenticated)?;
        let resolved = self.resolve(principal, cache);

        if required.is_empty() {
            return Ok(Access::Open);
        }

        if let Some(access) = self.membership(principal, resolved.as_ref(), required) {
            debug!(user_id = %principal.id(), "access granted");
            return Ok(access);
        }

        Err(AccessError::Forbidden(Box::new(Denial::new(
            principal.id(),
            resolved.map(|r| r.name().to_string()),
            required.clone(),
            target.clone(),
        )))
        .into())
    }

    /// Returns true if the principal holds any of `roles`.
    ///
    /// Uses the same cascade as [`authorize`](Self::authorize) but answers
    /// `false` for anonymous contexts and empty role sets instead of failing.
    pub fn has_any_role(&self, ctx: &mut AuthContext, roles: &RequiredRoles) -> bool {
        let (principal, cache) = ctx.parts_mut();
        let Some(principal) = principal else {
            return false;
        };
        if roles.is_empty() {
            return false;
        }
        let resolved = self.resolve(principal, cache);
        self.membership(principal, resolved.as_ref(), roles).is_some()
    }

    fn resolve(&self, principal: &Principal, cache: &mut RoleCache) -> Option<ResolvedRole> {
        if let Some(role) = cache.role() {
            return Some(ResolvedRole::new(role, RoleOrigin::Session));
        }

        match self.source.linked_role(principal) {
            Ok(Some(provided)) => {
                cache.store(provided.name.clone(), provided.employee_id);
                debug!(
                    user_id = %principal.id(),
                    role = %provided.name,
                    source = self.source.label(),
                    "cached linked role in session"
                );
                return Some(ResolvedRole::new(provided.name, RoleOrigin::Provider));
            }
            Ok(None) => {}
            Err(report) => {
                warn!(
                    user_id = %principal.id(),
                    source = self.source.label(),
                    error = %report,
                    "failed to fetch linked role"
                );
            }
        }

        principal
            .legacy_role()
            .filter(|role| !role.trim().is_empty())
            .map(|role| ResolvedRole::new(role, RoleOrigin::LegacyColumn))
    }

    fn membership(
        &self,
        principal: &Principal,
        resolved: Option<&ResolvedRole>,
        required: &RequiredRoles,
    ) -> Option<Access> {
        if let Some(policy) = self.source.policy() {
            for role in required.iter() {
                match policy.has_role(principal, role) {
                    Ok(true) => return Some(Access::GrantedByPolicy(role.as_str().to_string())),
                    Ok(false) => {}
                    Err(report) => {
                        warn!(
                            user_id = %principal.id(),
                            policy = policy.name(),
                            error = %report,
                            "role policy check failed"
                        );
                        break;
                    }
                }
            }
        }

        resolved
            .filter(|role| required.contains(role.name()))
            .map(|role| Access::Granted(role.clone()))
    }
}
