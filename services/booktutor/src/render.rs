//! Terminal rendering of tutor replies.

use booktutor_core::{Reply, activity::ActivityLogEntry, retrieval::CollectionStats};
use std::fmt::Write;

pub fn log_line(entry: &ActivityLogEntry) -> String {
    let mut line = format!("[{}] {}: {}", entry.timestamp, entry.agent, entry.action);
    if let Some(query) = &entry.qdrant_query {
        let _ = write!(line, " (query: {})", query);
    }
    line
}

/// The response, preceded by the activity log when `show_log` is set.
pub fn reply(reply: &Reply, show_log: bool) -> String {
    let mut out = String::new();
    if show_log {
        out.push_str("--- activity ---\n");
        for entry in &reply.log {
            out.push_str(&log_line(entry));
            out.push('\n');
        }
        out.push_str("----------------\n");
    }
    out.push_str(&reply.response);
    out
}

pub fn stats(book: &str, stats: &CollectionStats) -> String {
    let source = if stats.live {
        "Qdrant collection"
    } else {
        "built-in passages"
    };
    let vectors = stats
        .vectors_count
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Book: {}\nSource: {}\nPoints: {}\nVectors: {}",
        book, source, stats.points_count, vectors
    )
}
