//! Session storage.
//!
//! The role gate reads a session per request and writes the role cache back
//! when resolution changed it. The store is a seam so a database-backed
//! implementation can replace the in-memory one.

use crate::error::StoreError;
use async_trait::async_trait;
use hrdesk_access::{RoleCache, Session, SessionId};
use rootcause::prelude::Report;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistent session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Saves a new session, replacing any session with the same ID.
    async fn create(&self, session: Session) -> Result<(), Report<StoreError>>;

    /// Finds a session by ID. Expired sessions are returned as-is.
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>>;

    /// Replaces the role cache of an existing session.
    async fn update_cache(&self, id: &SessionId, cache: RoleCache)
    -> Result<(), Report<StoreError>>;

    /// Deletes a session. Deleting an unknown session is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>>;

    /// Deletes every expired session, returning how many were removed.
    async fn delete_expired(&self) -> Result<u64, Report<StoreError>>;
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> Result<(), Report<StoreError>> {
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session);
        Ok(())
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn update_cache(
        &self,
        id: &SessionId,
        cache: RoleCache,
    ) -> Result<(), Report<StoreError>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or_else(|| StoreError::NotFound {
            session_id: id.to_string(),
        })?;
        session.set_cache(cache);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<StoreError>> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok((before - sessions.len()) as u64)
    }
}
