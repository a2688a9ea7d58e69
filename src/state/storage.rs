//! Session storage implementations
//!
//! This module handles persistence of USSD sessions, including
//! serialization, expiration, and cleanup. The production backend is
//! Redis; an owned in-memory backend serves tests and single-node
//! development.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::session::UssdSession;
use crate::config::RedisConfig;
use crate::utils::errors::Result;

/// Storage contract for USSD sessions. Lookup is exact-match by the
/// gateway-assigned session identifier.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<UssdSession>>;
    async fn save(&self, session: &UssdSession) -> Result<()>;
    async fn delete(&self, session_id: &str) -> Result<()>;
}

/// Redis-based session store
#[derive(Clone)]
pub struct RedisSessionStore {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl RedisSessionStore {
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    fn session_key(&self, session_id: &str) -> String {
        format!("{}session:{}", self.config.prefix, session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<UssdSession>> {
        let key = self.session_key(session_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = match conn.get::<&str, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(session_id = session_id, error = %e, "Failed to get session from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                let session: UssdSession = match serde_json::from_str(&data) {
                    Ok(session) => session,
                    Err(e) => {
                        error!(session_id = session_id, error = %e, "Failed to deserialize session");
                        return Err(e.into());
                    }
                };

                if session.is_expired() {
                    warn!(session_id = session_id, "Session has expired, removing");
                    self.delete(session_id).await?;
                    return Ok(None);
                }

                debug!(session_id = session_id, screen = ?session.screen, "Session loaded");
                Ok(Some(session))
            }
            None => {
                debug!(session_id = session_id, "No session found in Redis");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &UssdSession) -> Result<()> {
        let key = self.session_key(&session.session_id);
        let serialized = serde_json::to_string(session)?;

        // Let Redis reap the key shortly after the session itself expires
        let ttl_seconds = {
            let remaining = session.expires_at - chrono::Utc::now();
            std::cmp::max(remaining.num_seconds(), 60) as u64
        };

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(session_id = %session.session_id, ttl_seconds = ttl_seconds, "Session saved");
                Ok(())
            }
            Err(e) => {
                error!(session_id = %session.session_id, error = %e, "Failed to save session to Redis");
                Err(e.into())
            }
        }
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let key = self.session_key(session_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        if deleted > 0 {
            debug!(session_id = session_id, "Session deleted");
        }

        Ok(())
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// In-memory session store behind the same contract.
///
/// An owned map, not module-level state: every instance is constructed and
/// handed around explicitly. Expired records are dropped on access.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, UssdSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<UssdSession>> {
        let expired = {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                Some(session) if session.is_expired() => true,
                Some(session) => return Ok(Some(session.clone())),
                None => return Ok(None),
            }
        };

        if expired {
            self.sessions.write().await.remove(session_id);
        }
        Ok(None)
    }

    async fn save(&self, session: &UssdSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_memory_store_save_load_delete() {
        let store = MemorySessionStore::new();
        let session = UssdSession::new("ATUid_1", "+254712345678", Duration::seconds(300));

        assert!(store.load("ATUid_1").await.unwrap().is_none());

        store.save(&session).await.unwrap();
        let loaded = store.load("ATUid_1").await.unwrap().unwrap();
        assert_eq!(loaded.phone_number, "+254712345678");

        store.delete("ATUid_1").await.unwrap();
        assert!(store.load("ATUid_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_drops_expired_sessions() {
        let store = MemorySessionStore::new();
        let mut session = UssdSession::new("ATUid_2", "+254712345678", Duration::seconds(300));
        session.expires_at = chrono::Utc::now() - Duration::seconds(1);

        store.save(&session).await.unwrap();
        assert!(store.load("ATUid_2").await.unwrap().is_none());
    }
}
