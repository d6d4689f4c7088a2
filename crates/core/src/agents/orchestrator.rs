//! Orchestrator Agent
//!
//! The single entry point for a tutoring turn. It classifies the query,
//! routes it to exactly one specialized agent, and returns that agent's
//! response together with the combined activity log of the whole turn.

use super::{
    AgentContext, AgentReply, quiz::QuizAgent, search::SearchAgent, tutor::TutorAgent,
};
use crate::{
    activity::{ActivityLog, ActivityLogEntry, AgentKind, preview},
    error::GenerationError,
    intent::Intent,
    session::SessionState,
};
use tracing::instrument;

/// The outcome of one orchestrated turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// The handling agent's response, unmodified.
    pub response: String,
    pub intent: Intent,
    /// Orchestrator entries followed by the handling agent's entries.
    pub log: Vec<ActivityLogEntry>,
    /// The caller's session after this turn; store it for the next one.
    pub session: SessionState,
}

/// Routes user queries to the tutor, search, or quiz agent.
///
/// The orchestrator holds no per-user state. Everything that has to survive
/// between turns travels in the [`SessionState`] passed to [`process`].
///
/// [`process`]: Orchestrator::process
pub struct Orchestrator {
    tutor: TutorAgent,
    search: SearchAgent,
    quiz: QuizAgent,
}

impl Orchestrator {
    pub fn new(ctx: AgentContext) -> Self {
        Self {
            tutor: TutorAgent::new(ctx.clone()),
            search: SearchAgent::new(ctx.clone()),
            quiz: QuizAgent::new(ctx),
        }
    }

    /// Serves one user turn.
    ///
    /// Generation failures from the handling agent are returned as-is; the
    /// session the caller passed in remains the valid one in that case.
    #[instrument(skip(self, session))]
    pub async fn process(
        &self,
        query: &str,
        session: &SessionState,
    ) -> Result<Reply, GenerationError> {
        let mut log = ActivityLog::new(AgentKind::Orchestrator);
        log.record(format!("Analyzing query: {}", preview(query, 50)));

        let intent = Intent::classify(query);
        log.record(format!("Classified intent: {}", intent));

        let mut session = session.clone();
        let reply = match intent {
            Intent::Teach => {
                log.record("Routing to Tutor Agent");
                let outcome = self.tutor.teach(query, session.teaching).await?;
                session.teaching = outcome.progress;
                outcome.reply
            }
            Intent::Search => {
                log.record("Routing to Search Agent");
                self.search.semantic_search(query).await?
            }
            Intent::Quiz => {
                log.record("Routing to Quiz Agent");
                self.quiz.generate_quiz(query).await?
            }
        };

        let AgentReply {
            response,
            log: agent_log,
        } = reply;
        log.extend(agent_log);

        Ok(Reply {
            response,
            intent,
            log: log.into_entries(),
            session,
        })
    }
}
