//! In-memory evaluation and session stores.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::model::{EvaluationOutcome, SessionMeta, StoredEvaluation};
use crate::traits::{EvaluationStore, SessionStore};

/// Evaluation store backed by a vector. Identities start at 1.
#[derive(Debug, Default)]
pub struct InMemoryEvaluationStore {
    records: RwLock<Vec<StoredEvaluation>>,
}

impl InMemoryEvaluationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl EvaluationStore for InMemoryEvaluationStore {
    async fn save(&self, outcome: EvaluationOutcome) -> anyhow::Result<StoredEvaluation> {
        let mut records = self.records.write();
        let stored = StoredEvaluation {
            id: records.len() as u64 + 1,
            outcome,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_session(&self, session_id: &str) -> anyhow::Result<Vec<StoredEvaluation>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.outcome.session_id.as_deref() == Some(session_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: u64) -> anyhow::Result<Option<StoredEvaluation>> {
        Ok(self.records.read().iter().find(|r| r.id == id).cloned())
    }

    async fn all(&self) -> anyhow::Result<Vec<StoredEvaluation>> {
        Ok(self.records.read().clone())
    }
}

struct SessionEntry {
    meta: SessionMeta,
    inserted_at: Instant,
}

/// Session store guarded by a read-write lock, with optional TTL expiry.
///
/// Without a TTL sessions live until removed. With one, expired sessions are
/// invisible to [`SessionStore::get`] and dropped by
/// [`SessionStore::evict_expired`].
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, SessionEntry>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, meta: SessionMeta) {
        let entry = SessionEntry {
            meta,
            inserted_at: Instant::now(),
        };
        self.entries
            .write()
            .insert(entry.meta.session_id.clone(), entry);
    }

    fn get(&self, session_id: &str) -> Option<SessionMeta> {
        let entries = self.entries.read();
        let entry = entries.get(session_id)?;
        if self.is_expired(entry) {
            return None;
        }
        Some(entry.meta.clone())
    }

    fn remove(&self, session_id: &str) -> Option<SessionMeta> {
        self.entries.write().remove(session_id).map(|e| e.meta)
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn evict_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!("evicted {evicted} expired sessions");
        }
        evicted
    }
}
