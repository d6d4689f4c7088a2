//! Quiz generation agent.
//!
//! The query only selects quiz mode; the topic is drawn at random from the
//! book's quiz topics.

use super::{AgentContext, AgentReply};
use crate::{
    activity::{ActivityLog, AgentKind},
    error::GenerationError,
    llm_client::GenerationRequest,
    prompts::render,
};
use rand::{Rng, seq::IndexedRandom};
use tracing::instrument;

const RETRIEVAL_LIMIT: usize = 3;
pub const TEMPERATURE: f32 = 0.8;
pub const MAX_TOKENS: u32 = 600;

pub struct QuizAgent {
    ctx: AgentContext,
}

impl QuizAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    /// Picks a quiz topic uniformly at random, falling back to the book title
    /// when the profile lists no topics.
    pub fn pick_topic<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.ctx
            .book
            .quiz_topics
            .choose(rng)
            .unwrap_or(&self.ctx.book.title)
            .clone()
    }

    /// Generates a three-question multiple-choice quiz on a random topic.
    #[instrument(skip(self))]
    pub async fn generate_quiz(&self, query: &str) -> Result<AgentReply, GenerationError> {
        let topic = {
            let mut rng = rand::rng();
            self.pick_topic(&mut rng)
        };
        self.generate_quiz_on(&topic).await
    }

    /// Generates the quiz for an already chosen `topic`.
    pub async fn generate_quiz_on(&self, topic: &str) -> Result<AgentReply, GenerationError> {
        let mut log = ActivityLog::new(AgentKind::Quiz);
        log.record("Preparing quiz generation");

        log.record_query(format!("Retrieving content about: {}", topic), topic);
        let passages = self.ctx.retriever.search(topic, RETRIEVAL_LIMIT).await;
        log.record(format!("Retrieved {} passages", passages.len()));

        log.record("Generating quiz with LLM");
        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let mut vars = self.ctx.book_vars().to_vec();
        vars.extend([("topic", topic), ("context", context.as_str())]);
        let request = GenerationRequest::new(
            render(&self.ctx.prompts.quiz_system, &vars),
            render(&self.ctx.prompts.quiz, &vars),
            self.ctx.params(TEMPERATURE, MAX_TOKENS),
        );
        let quiz = self.ctx.llm.generate(request).await?;

        let response = format!(
            "📝 **Quiz Time!** (Topic: {})\n\n{}\n\n*Take your time and think through each answer!*",
            topic, quiz
        );
        log.record("Quiz generated successfully");

        Ok(AgentReply {
            response,
            log: log.into_entries(),
        })
    }
}
