//! Sequential teaching agent.
//!
//! Teaches one section of the book per call and moves the learner's cursor to
//! the next section once the explanation has been generated.

use super::{AgentContext, AgentReply};
use crate::{
    activity::{ActivityLog, AgentKind},
    error::GenerationError,
    llm_client::GenerationRequest,
    prompts::render,
    session::TeachingProgress,
};
use tracing::{debug, instrument};

const RETRIEVAL_LIMIT: usize = 3;
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

/// Result of one teaching turn: the reply and where the learner is now.
#[derive(Debug, Clone, PartialEq)]
pub struct TeachOutcome {
    pub reply: AgentReply,
    pub progress: TeachingProgress,
}

pub struct TutorAgent {
    ctx: AgentContext,
}

fn starts_new_session(query: &str) -> bool {
    let query = query.to_lowercase();
    query.contains("start") || query.contains("begin")
}

impl TutorAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    /// Teaches the section at `progress`, restarting from the first section
    /// when the query asks to start or begin.
    ///
    /// The returned progress is only meaningful on success; on a generation
    /// failure the caller keeps the progress it passed in.
    #[instrument(skip(self), fields(cursor = progress.section_index()))]
    pub async fn teach(
        &self,
        query: &str,
        progress: TeachingProgress,
    ) -> Result<TeachOutcome, GenerationError> {
        let mut log = ActivityLog::new(AgentKind::Tutor);
        log.record("Preparing teaching content");

        let progress = if starts_new_session(query) {
            debug!("Query starts a new teaching session");
            progress.restart()
        } else {
            progress
        };

        let book = &self.ctx.book;
        let total = book.sections.len();
        let section = book
            .sections
            .get(progress.position(total))
            .unwrap_or(&book.title)
            .as_str();

        log.record_query(format!("Querying Qdrant for: {}", section), section);
        let passages = self.ctx.retriever.search(section, RETRIEVAL_LIMIT).await;
        log.record(format!("Retrieved {} relevant passages", passages.len()));

        log.record("Generating explanation with LLM");
        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let mut vars = self.ctx.book_vars().to_vec();
        vars.extend([
            ("section", section),
            ("context", context.as_str()),
            ("query", query),
        ]);
        let request = GenerationRequest::new(
            render(&self.ctx.prompts.tutor_system, &vars),
            render(&self.ctx.prompts.tutor, &vars),
            self.ctx.params(TEMPERATURE, MAX_TOKENS),
        );
        let explanation = self.ctx.llm.generate(request).await?;

        let progress = progress.advance(total);
        let response = format!(
            "📖 **{}**\n\n{}\n\n*Progress: Section {}/{}*",
            section,
            explanation,
            progress.section_index(),
            total
        );
        log.record("Teaching complete");

        Ok(TeachOutcome {
            reply: AgentReply {
                response,
                log: log.into_entries(),
            },
            progress,
        })
    }
}
