//! Server-side sessions keyed by a cookie id.
//!
//! A session is loaded at the start of a request, read and modified through
//! [`Session::get`] / [`Session::insert`], and written back explicitly with
//! [`SessionService::save`]. Nothing here is process-global: every value
//! lives in the configured [`SessionStore`].

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
};

/// Session key of the dashboard visit counter
pub const NUM_VISITS_KEY: &str = "num_visits";

pub type SessionData = serde_json::Map<String, serde_json::Value>;

/// Backend holding session data between requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Data of a live session, `None` if unknown or expired
    async fn load(&self, session_id: &str) -> AppResult<Option<SessionData>>;

    /// Replace the data of a session and restart its expiry
    async fn save(&self, session_id: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()>;
}

/// One client's session for the duration of a request
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    data: SessionData,
    is_new: bool,
}

impl Session {
    /// Fresh empty session with a random id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            data: SessionData::new(),
            is_new: true,
        }
    }

    fn existing(id: &str, data: SessionData) -> Self {
        Self {
            id: id.to_string(),
            data,
            is_new: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when the client has no cookie for this session yet
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, value: T) -> AppResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(format!("Unserializable session value: {}", e)))?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Resume the session named by the client's cookie, or start a new one
    pub async fn load(&self, session_id: Option<&str>) -> AppResult<Session> {
        if let Some(id) = session_id {
            if let Some(data) = self.store.load(id).await? {
                return Ok(Session::existing(id, data));
            }
            tracing::debug!("Session {} unknown or expired, starting a new one", id);
        }
        Ok(Session::new())
    }

    pub async fn save(&self, session: &Session) -> AppResult<()> {
        self.store
            .save(&session.id, &session.data, self.config.ttl_seconds)
            .await
    }

    /// Count a dashboard visit: returns the number of earlier visits and
    /// stores that number plus one.
    pub async fn record_visit(&self, session: &mut Session) -> AppResult<i64> {
        let num_visits: i64 = session.get(NUM_VISITS_KEY).unwrap_or(0);
        session.insert(NUM_VISITS_KEY, num_visits + 1)?;
        self.save(session).await?;
        Ok(num_visits)
    }
}

/// How often the in-memory store sweeps out expired sessions
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Default)]
struct MemorySessions {
    entries: HashMap<String, (SessionData, Instant)>,
    last_pruned: Option<Instant>,
}

impl MemorySessions {
    fn prune_if_due(&mut self, now: Instant, interval: Duration) {
        let due = self
            .last_pruned
            .map_or(true, |at| now.duration_since(at) >= interval);
        if due {
            self.entries.retain(|_, (_, expires_at)| *expires_at > now);
            self.last_pruned = Some(now);
        }
    }
}

/// In-process session store, for single-instance deployments and tests.
/// Expired sessions are ignored on load and swept out at most once per
/// prune interval.
pub struct MemorySessionStore {
    sessions: RwLock<MemorySessions>,
    prune_interval: Duration,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_prune_interval(PRUNE_INTERVAL)
    }

    pub fn with_prune_interval(prune_interval: Duration) -> Self {
        Self {
            sessions: RwLock::new(MemorySessions::default()),
            prune_interval,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> AppResult<Option<SessionData>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .entries
            .get(session_id)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(data, _)| data.clone()))
    }

    async fn save(&self, session_id: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()> {
        let now = Instant::now();
        let expires_at = now + Duration::from_secs(ttl_seconds);
        let mut sessions = self.sessions.write().await;
        sessions.prune_if_due(now, self.prune_interval);
        sessions
            .entries
            .insert(session_id.to_string(), (data.clone(), expires_at));
        Ok(())
    }
}
