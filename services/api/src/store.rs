//! In-Memory Session Store
//!
//! Holds every live tutoring session: its [`SessionState`] and its chat
//! history. Each session carries two locks. The turn lock is held for a whole
//! tutoring turn so that turns on one session are served one after the other.
//! The record lock guards the session data and is only held long enough to
//! copy or update it, so reads never wait on a model call.

use booktutor_core::SessionState;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock as SyncRwLock},
};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::models::{Message, MessageRole};

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub state: SessionState,
    pub history: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: SessionState::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message to the history and bumps `updated_at`.
    pub fn push_message(&mut self, role: MessageRole, content: impl Into<String>) {
        let now = Utc::now();
        self.history.push(Message {
            id: self.history.len() as i64 + 1,
            session_id: self.id,
            role,
            content: content.into(),
            created_at: now,
        });
        self.updated_at = now;
    }
}

/// One stored session.
#[derive(Debug)]
pub struct SessionEntry {
    turn: Mutex<()>,
    record: SyncRwLock<SessionRecord>,
}

impl SessionEntry {
    fn new(record: SessionRecord) -> Self {
        Self {
            turn: Mutex::new(()),
            record: SyncRwLock::new(record),
        }
    }

    /// Waits until no other turn is running on this session.
    ///
    /// Hold the guard for the whole turn; reads through [`snapshot`] are not
    /// blocked by it.
    ///
    /// [`snapshot`]: SessionEntry::snapshot
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    pub fn snapshot(&self) -> SessionRecord {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` to the record under a short write lock.
    pub fn update<T>(&self, f: impl FnOnce(&mut SessionRecord) -> T) -> T {
        let mut record = self.record.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut record)
    }
}

pub type SharedEntry = Arc<SessionEntry>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with a fresh teaching cursor and returns a snapshot.
    pub async fn create(&self) -> SessionRecord {
        let record = SessionRecord::new();
        self.sessions
            .write()
            .await
            .insert(record.id, Arc::new(SessionEntry::new(record.clone())));
        info!(session_id = %record.id, "Session created.");
        record
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedEntry> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Snapshots of all sessions, newest first.
    pub async fn list(&self) -> Vec<SessionRecord> {
        let mut snapshots: Vec<SessionRecord> = self
            .sessions
            .read()
            .await
            .values()
            .map(|entry| entry.snapshot())
            .collect();
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snapshots
    }

    /// Removes a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session deleted.");
        }
        removed
    }
}
