//! API Models
//!
//! Request and response bodies of the REST API. Core types that carry no
//! `utoipa` schema are exposed through the view structs defined here.

use booktutor_core::{
    Intent, TeachingProgress,
    activity::ActivityLogEntry,
    book::BookProfile,
    retrieval::CollectionStats,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::SessionRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Ai => write!(f, "ai"),
        }
    }
}

/// How far a session has come through the book's sections.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Progress {
    /// Teaching cursor, never past the last section.
    pub section_index: usize,
    /// The section the next teaching turn will cover.
    pub next_section: String,
    pub total_sections: usize,
}

impl Progress {
    pub fn new(progress: TeachingProgress, book: &BookProfile) -> Self {
        let total_sections = book.sections.len();
        let next_section = book
            .sections
            .get(progress.position(total_sections))
            .cloned()
            .unwrap_or_else(|| book.title.clone());
        Self {
            section_index: progress.section_index(),
            next_section,
            total_sections,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Session {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub progress: Progress,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn from_record(record: &SessionRecord, book: &BookProfile) -> Self {
        Self {
            id: record.id,
            progress: Progress::new(record.state.teaching, book),
            message_count: record.history.len(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    #[schema(value_type = String, example = "user")]
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema)]
pub struct ChatPayload {
    #[schema(example = "What does the book say about taxes?")]
    pub query: String,
}

/// One step an agent took while answering a query.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct LogEntry {
    #[schema(example = "orchestrator")]
    pub agent: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qdrant_query: Option<String>,
    #[schema(example = "14:03:27")]
    pub timestamp: String,
}

impl From<ActivityLogEntry> for LogEntry {
    fn from(entry: ActivityLogEntry) -> Self {
        Self {
            agent: entry.agent.to_string(),
            action: entry.action,
            qdrant_query: entry.qdrant_query,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ChatResponse {
    pub response: String,
    #[schema(value_type = String, example = "teach")]
    pub intent: Intent,
    pub log: Vec<LogEntry>,
    pub progress: Progress,
}

#[derive(Serialize, ToSchema, Debug, PartialEq)]
pub struct StatsResponse {
    pub book: String,
    pub points_count: u64,
    pub vectors_count: Option<u64>,
    /// False when the numbers describe the built-in passages rather than a
    /// live Qdrant collection.
    pub live: bool,
}

impl StatsResponse {
    pub fn new(stats: CollectionStats, book: &BookProfile) -> Self {
        Self {
            book: book.title.clone(),
            points_count: stats.points_count,
            vectors_count: stats.vectors_count,
            live: stats.live,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use booktutor_core::activity::AgentKind;
    use chrono::TimeZone;
    use serde_json;

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&MessageRole::Ai).unwrap(), "\"ai\"");

        let role: MessageRole = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(role, MessageRole::Ai);
    }

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Ai.to_string(), "ai");
    }

    #[test]
    fn test_progress_names_next_section() {
        let book = BookProfile::default();
        let progress = Progress::new(TeachingProgress::new().advance(10), &book);

        assert_eq!(progress.section_index, 1);
        assert_eq!(progress.next_section, book.sections[1]);
        assert_eq!(progress.total_sections, 10);
    }

    #[test]
    fn test_progress_at_end_of_book_stays_on_last_section() {
        let book = BookProfile::default();
        let mut cursor = TeachingProgress::new();
        for _ in 0..20 {
            cursor = cursor.advance(book.sections.len());
        }

        let progress = Progress::new(cursor, &book);
        assert_eq!(progress.section_index, 9);
        assert_eq!(progress.next_section, book.sections[9]);
    }

    #[test]
    fn test_progress_without_sections_uses_title() {
        let book = BookProfile {
            sections: Vec::new(),
            ..BookProfile::default()
        };

        let progress = Progress::new(TeachingProgress::new(), &book);
        assert_eq!(progress.next_section, book.title);
        assert_eq!(progress.total_sections, 0);
    }

    #[test]
    fn test_log_entry_from_activity_entry() {
        let entry = ActivityLogEntry::new(AgentKind::Search, "Searching Qdrant vector database")
            .with_query("taxes");

        let view = LogEntry::from(entry.clone());
        assert_eq!(view.agent, "search");
        assert_eq!(view.action, entry.action);
        assert_eq!(view.qdrant_query.as_deref(), Some("taxes"));
        assert_eq!(view.timestamp, entry.timestamp);
    }

    #[test]
    fn test_log_entry_omits_missing_query() {
        let view = LogEntry::from(ActivityLogEntry::new(AgentKind::Orchestrator, "x"));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("qdrant_query").is_none());
        assert_eq!(json["agent"], "orchestrator");
    }

    #[test]
    fn test_chat_response_serialization() {
        let response = ChatResponse {
            response: "Hello".to_string(),
            intent: Intent::Quiz,
            log: Vec::new(),
            progress: Progress::new(TeachingProgress::new(), &BookProfile::default()),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["intent"], "quiz");
        assert_eq!(json["progress"]["section_index"], 0);
        assert_eq!(json["progress"]["next_section"], "Introduction and Background");
    }

    #[test]
    fn test_chat_payload_deserialization() {
        let payload: ChatPayload = serde_json::from_str(r#"{"query": "quiz me"}"#).unwrap();
        assert_eq!(payload.query, "quiz me");

        assert!(serde_json::from_str::<ChatPayload>("{}").is_err());
    }

    #[test]
    fn test_message_serialization() {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let message = Message {
            id: 1,
            session_id: Uuid::nil(),
            role: MessageRole::User,
            content: "teach me".to_string(),
            created_at,
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["session_id"], "00000000-0000-0000-0000-000000000000");

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_stats_response_from_collection_stats() {
        let stats = CollectionStats {
            points_count: 42,
            vectors_count: Some(42),
            live: true,
        };

        let view = StatsResponse::new(stats, &BookProfile::default());
        assert_eq!(view.book, "Rich Dad Poor Dad");
        assert_eq!(view.points_count, 42);
        assert!(view.live);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Session not found".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"Session not found"}"#);
    }
}
