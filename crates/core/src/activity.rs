//! Activity Log
//!
//! Every component that touches a request records what it did as an
//! [`ActivityLogEntry`]. The entries of one turn are returned to the caller
//! in emission order so a front end can show how the answer was produced.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// The component that emitted a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Orchestrator,
    Tutor,
    Search,
    Quiz,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Orchestrator => write!(f, "orchestrator"),
            AgentKind::Tutor => write!(f, "tutor"),
            AgentKind::Search => write!(f, "search"),
            AgentKind::Quiz => write!(f, "quiz"),
        }
    }
}

/// One immutable record of an action taken while serving a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub agent: AgentKind,
    pub action: String,
    /// The text sent to the retrieval store, when the action was a lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qdrant_query: Option<String>,
    /// Local wall-clock time formatted as `HH:MM:SS`.
    pub timestamp: String,
}

impl ActivityLogEntry {
    pub fn new(agent: AgentKind, action: impl Into<String>) -> Self {
        Self {
            agent,
            action: action.into(),
            qdrant_query: None,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.qdrant_query = Some(query.into());
        self
    }
}

/// An append-only log owned by a single agent for the duration of one call.
#[derive(Debug)]
pub struct ActivityLog {
    agent: AgentKind,
    entries: Vec<ActivityLogEntry>,
}

impl ActivityLog {
    pub fn new(agent: AgentKind) -> Self {
        Self {
            agent,
            entries: Vec::new(),
        }
    }

    /// Appends an entry and mirrors it to the tracing output.
    pub fn record(&mut self, action: impl Into<String>) {
        let entry = ActivityLogEntry::new(self.agent, action);
        info!(agent = %entry.agent, action = %entry.action, "activity");
        self.entries.push(entry);
    }

    /// Appends an entry describing a retrieval lookup.
    pub fn record_query(&mut self, action: impl Into<String>, query: &str) {
        let entry = ActivityLogEntry::new(self.agent, action).with_query(query);
        info!(agent = %entry.agent, action = %entry.action, qdrant_query = %query, "activity");
        self.entries.push(entry);
    }

    /// Appends entries produced elsewhere, keeping their order.
    pub fn extend(&mut self, entries: Vec<ActivityLogEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[ActivityLogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ActivityLogEntry> {
        self.entries
    }
}

/// Shortens a query for a log line: at most `max` characters followed by `...`.
pub fn preview(text: &str, max: usize) -> String {
    let head: String = text.chars().take(max).collect();
    format!("{}...", head)
}
