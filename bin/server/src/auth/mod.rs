//! Sessions and role-gated routing for the hrdesk server.
//!
//! This module provides:
//! - In-memory session storage behind the [`SessionStore`] seam
//! - The [`require_roles`] middleware that resolves the caller's effective
//!   role and admits or rejects the request
//! - The [`CurrentUser`] extractor for handlers behind a gate
//! - Logout
//!
//! # Authorization Model
//!
//! Each route group declares the roles it requires (possibly none). The
//! gate resolves the principal's effective role through
//! [`AccessResolver`](hrdesk_access::AccessResolver), caching it in the
//! session, and answers with 401 or 403 when the request is not admitted.
//! Finer per-record decisions (whose leave requests can I see?) are made by
//! handlers with [`RecordScope`](hrdesk_access::RecordScope).
//!
//! Establishing who the principal is (the login flow) happens elsewhere;
//! such a flow calls [`AppState::start_session`] and sets the returned cookie.

pub mod middleware;
pub mod routes;
pub mod store;

use crate::config::{ServerConfig, SessionConfig};
use crate::error::StoreError;
use axum_extra::extract::cookie::{Cookie, SameSite};
use hrdesk_access::{AccessResolver, MemoryDirectory, RequiredRoles, Session, SessionId};
use hrdesk_core::UserId;
use rootcause::prelude::Report;
use std::sync::Arc;
use time::Duration as TimeDuration;

pub use middleware::{AuthRejection, CurrentUser, ResponseFormat, RoleGate, require_roles};
pub use routes::{logout, me};
pub use store::{MemorySessionStore, SessionStore};

/// Shared application state.
pub struct AppState {
    /// Accounts, employees and roles.
    pub directory: Arc<MemoryDirectory>,
    /// Session storage.
    pub sessions: Arc<dyn SessionStore>,
    /// Effective-role resolver over the configured role source.
    pub resolver: AccessResolver,
    /// Roles that see every employee's records.
    pub privileged_roles: RequiredRoles,
    /// Session configuration.
    pub session_config: SessionConfig,
    /// Where unauthenticated page requests are sent.
    pub login_path: String,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        directory: Arc<MemoryDirectory>,
        sessions: Arc<dyn SessionStore>,
        config: &ServerConfig,
    ) -> Self {
        let resolver = config.access.resolver(directory.clone());
        tracing::info!(role_source = resolver.source().label(), "Configured role source");

        Self {
            directory,
            sessions,
            resolver,
            privileged_roles: config.access.privileged_roles(),
            session_config: config.session.clone(),
            login_path: config.login_path.clone(),
        }
    }

    /// Opens a session for `user_id` and builds its cookie.
    ///
    /// The role cache starts empty; the first gated request fills it.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the session cannot be saved.
    pub async fn start_session(
        &self,
        user_id: UserId,
    ) -> Result<(Session, Cookie<'static>), Report<StoreError>> {
        let session = Session::new(
            SessionId::generate(),
            user_id,
            self.session_config.duration(),
        );
        self.sessions.create(session.clone()).await?;
        tracing::info!(user_id = %user_id, "Session started");

        let cookie = Cookie::build((
            self.session_config.cookie_name.clone(),
            session.id().to_string(),
        ))
        .path("/")
        .http_only(true)
        .secure(self.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(self.session_config.duration_minutes))
        .build();

        Ok((session, cookie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_session_stores_session_and_builds_cookie() {
        let store = Arc::new(MemorySessionStore::new());
        let state = AppState::new(
            Arc::new(MemoryDirectory::new()),
            store.clone(),
            &ServerConfig::default(),
        );
        let user_id = UserId::new();

        let (session, cookie) = state.start_session(user_id).await.expect("start");

        assert_eq!(session.user_id(), user_id);
        assert!(session.cache().is_empty());
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), session.id().as_str());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(TimeDuration::minutes(120)));
        assert!(store.find(session.id()).await.expect("find").is_some());
    }
}
