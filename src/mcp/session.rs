use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::transport::McpConnection;

/// A stateful protocol session, created by a successful `initialize`
#[derive(Debug)]
pub struct McpSession {
    pub id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    last_seen: AtomicI64,
    connection: Arc<McpConnection>,
}

impl McpSession {
    pub fn new(id: String, connection: Arc<McpConnection>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            created_at: now,
            last_seen: AtomicI64::new(now.timestamp_millis()),
            connection,
        }
    }

    pub fn connection(&self) -> &Arc<McpConnection> {
        &self.connection
    }

    /// Mark the session as active now
    pub fn touch(&self) {
        self.touch_at(chrono::Utc::now().timestamp_millis());
    }

    pub(crate) fn touch_at(&self, millis: i64) {
        self.last_seen.store(millis, Ordering::Relaxed);
    }

    pub fn is_expired(&self, ttl: Duration, now_millis: i64) -> bool {
        let idle = now_millis.saturating_sub(self.last_seen.load(Ordering::Relaxed));
        idle > ttl.as_millis() as i64
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionStoreError {
    #[error("Server at capacity")]
    AtCapacity,
    #[error("Session already exists: {0}")]
    Duplicate(String),
}

/// Session table seam; the in-memory store is the only implementation
/// today, which limits stateful mode to a single process.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Live session by id; expired sessions are reported as unknown
    async fn get(&self, id: &str) -> Option<Arc<McpSession>>;
    async fn put(&self, session: Arc<McpSession>) -> Result<(), SessionStoreError>;
    async fn delete(&self, id: &str) -> Option<Arc<McpSession>>;
    async fn len(&self) -> usize;
    /// Drop every session idle past the TTL and hand them back for closing
    async fn remove_expired(&self) -> Vec<Arc<McpSession>>;
}

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<McpSession>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            max_sessions,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Option<Arc<McpSession>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id)?;
        if session.is_expired(self.ttl, chrono::Utc::now().timestamp_millis()) {
            return None;
        }
        Some(session.clone())
    }

    async fn put(&self, session: Arc<McpSession>) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            // expired entries the sweeper has not reached yet do not hold capacity
            let now = chrono::Utc::now().timestamp_millis();
            let ttl = self.ttl;
            sessions.retain(|_, existing| {
                let live = !existing.is_expired(ttl, now);
                if !live {
                    existing.connection().close();
                }
                live
            });
        }
        if sessions.contains_key(&session.id) {
            return Err(SessionStoreError::Duplicate(session.id.clone()));
        }
        if sessions.len() >= self.max_sessions {
            return Err(SessionStoreError::AtCapacity);
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Option<Arc<McpSession>> {
        self.sessions.write().await.remove(id)
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn remove_expired(&self) -> Vec<Arc<McpSession>> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(self.ttl, now))
            .map(|(id, _)| id.clone())
            .collect();
        expired
            .into_iter()
            .filter_map(|id| sessions.remove(&id))
            .collect()
    }
}

/// Sweep interval for a given idle TTL: half the TTL, never under a minute
pub fn sweep_interval(ttl: Duration) -> Duration {
    std::cmp::max(ttl / 2, Duration::from_secs(60))
}

/// Periodically evict idle sessions and close their connections
pub fn spawn_sweeper(store: Arc<dyn SessionStore>, ttl: Duration) -> JoinHandle<()> {
    spawn_sweeper_every(store, sweep_interval(ttl))
}

pub(crate) fn spawn_sweeper_every(store: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let expired = store.remove_expired().await;
            if expired.is_empty() {
                continue;
            }
            for session in &expired {
                session.connection().close();
            }
            let remaining = store.len().await;
            tracing::info!(
                evicted = expired.len(),
                remaining = remaining,
                "Evicted idle MCP sessions"
            );
        }
    })
}
