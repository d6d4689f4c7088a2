//! Tutoring Agents
//!
//! Three specialized agents share the same shape: look up passages, build a
//! prompt around them, ask the model, and format the answer. The
//! [`orchestrator::Orchestrator`] decides which one serves a query.
//!
//! - `tutor`: walks through the book section by section.
//! - `search`: answers free-form questions from the best matching passages.
//! - `quiz`: writes a multiple-choice quiz on a random topic.

pub mod orchestrator;
pub mod quiz;
pub mod search;
pub mod tutor;

use crate::{
    activity::ActivityLogEntry,
    book::BookProfile,
    llm_client::{GenerationParams, LLMClient},
    prompts::Prompts,
    retrieval::Retriever,
};
use std::sync::Arc;

/// Collaborators and settings shared by every agent.
#[derive(Clone)]
pub struct AgentContext {
    pub retriever: Arc<dyn Retriever>,
    pub llm: Arc<dyn LLMClient>,
    pub book: Arc<BookProfile>,
    pub prompts: Arc<Prompts>,
    pub model: String,
}

impl AgentContext {
    pub(crate) fn params(&self, temperature: f32, max_tokens: u32) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            temperature,
            max_tokens,
        }
    }

    /// Placeholder values common to every template.
    pub(crate) fn book_vars(&self) -> [(&str, &str); 2] {
        [
            ("book", self.book.title.as_str()),
            ("author", self.book.author.as_str()),
        ]
    }
}

/// What an agent hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub response: String,
    pub log: Vec<ActivityLogEntry>,
}
