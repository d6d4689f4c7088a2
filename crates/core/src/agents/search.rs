//! Semantic search agent.

use super::{AgentContext, AgentReply};
use crate::{
    activity::{ActivityLog, AgentKind, preview},
    error::GenerationError,
    llm_client::GenerationRequest,
    prompts::render,
};
use tracing::instrument;

const RETRIEVAL_LIMIT: usize = 5;
const SOURCES_SHOWN: usize = 3;
pub const TEMPERATURE: f32 = 0.6;
pub const MAX_TOKENS: u32 = 400;

/// Returned instead of calling the model when nothing relevant was retrieved.
pub const NOT_FOUND_MESSAGE: &str =
    "I couldn't find relevant information in the book. Try rephrasing your question!";

pub struct SearchAgent {
    ctx: AgentContext,
}

impl SearchAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    /// Answers `query` from the retrieved passages and lists the top sources.
    ///
    /// An empty retrieval short-circuits to [`NOT_FOUND_MESSAGE`] without a
    /// generation call.
    #[instrument(skip(self))]
    pub async fn semantic_search(&self, query: &str) -> Result<AgentReply, GenerationError> {
        let mut log = ActivityLog::new(AgentKind::Search);
        log.record(format!("Initiating semantic search: {}", preview(query, 50)));

        log.record_query("Searching Qdrant vector database", query);
        let passages = self.ctx.retriever.search(query, RETRIEVAL_LIMIT).await;
        log.record(format!("Found {} relevant passages", passages.len()));

        if passages.is_empty() {
            log.record("Search complete: no relevant passages");
            return Ok(AgentReply {
                response: NOT_FOUND_MESSAGE.to_string(),
                log: log.into_entries(),
            });
        }

        log.record("Generating answer with LLM");
        let context = passages
            .iter()
            .enumerate()
            .map(|(i, p)| format!("[Passage {}]: {}", i + 1, p.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        let mut vars = self.ctx.book_vars().to_vec();
        vars.extend([("context", context.as_str()), ("query", query)]);
        let request = GenerationRequest::new(
            render(&self.ctx.prompts.search_system, &vars),
            render(&self.ctx.prompts.search, &vars),
            self.ctx.params(TEMPERATURE, MAX_TOKENS),
        );
        let answer = self.ctx.llm.generate(request).await?;

        let sources: String = passages
            .iter()
            .take(SOURCES_SHOWN)
            .enumerate()
            .map(|(i, p)| format!("- Passage {} (relevance: {:.2})\n", i + 1, p.score))
            .collect();
        let response = format!("{}\n\n📚 **Sources:**\n{}", answer, sources);
        log.record("Search complete");

        Ok(AgentReply {
            response,
            log: log.into_entries(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agents::{
            test_support::{context, llm_answering, retriever_with},
            tutor,
        },
        llm_client::MockLLMClient,
        retrieval::{MockRetriever, RetrievedPassage},
    };

    #[tokio::test]
    async fn test_empty_retrieval_skips_generation() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate().never();

        let agent = SearchAgent::new(context(retriever_with(0), llm));
        let reply = agent.semantic_search("what about taxes").await.unwrap();

        assert_eq!(reply.response, NOT_FOUND_MESSAGE);
        let actions: Vec<&str> = reply.log.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Initiating semantic search: what about taxes...",
                "Searching Qdrant vector database",
                "Found 0 relevant passages",
                "Search complete: no relevant passages",
            ]
        );
    }

    #[tokio::test]
    async fn test_answer_lists_top_three_sources() {
        let mut retriever = MockRetriever::new();
        retriever.expect_search().returning(|_, _| {
            vec![
                RetrievedPassage::new("a", 0.912),
                RetrievedPassage::new("b", 0.8),
                RetrievedPassage::new("c", 0.556),
                RetrievedPassage::new("d", 0.4),
                RetrievedPassage::new("e", 0.3),
            ]
        });

        let agent = SearchAgent::new(context(retriever, llm_answering("Taxes favour owners.")));
        let reply = agent
            .semantic_search("what does the book say about taxes")
            .await
            .unwrap();

        assert_eq!(
            reply.response,
            "Taxes favour owners.\n\n📚 **Sources:**\n\
             - Passage 1 (relevance: 0.91)\n\
             - Passage 2 (relevance: 0.80)\n\
             - Passage 3 (relevance: 0.56)\n"
        );
    }

    #[tokio::test]
    async fn test_fewer_than_three_sources() {
        let agent = SearchAgent::new(context(retriever_with(1), llm_answering("x")));
        let reply = agent.semantic_search("find assets").await.unwrap();

        assert!(reply.response.contains("- Passage 1 (relevance: 0.90)"));
        assert!(!reply.response.contains("- Passage 2"));
    }

    #[tokio::test]
    async fn test_retrieves_raw_query_with_limit_five() {
        let mut retriever = MockRetriever::new();
        retriever
            .expect_search()
            .withf(|query, limit| query == "Why Is My House A Liability?" && *limit == 5)
            .times(1)
            .returning(|_, _| Vec::new());

        let agent = SearchAgent::new(context(retriever, MockLLMClient::new()));
        agent
            .semantic_search("Why Is My House A Liability?")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generation_request_shape() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate()
            .withf(|request| {
                let user = request.user_content().unwrap_or_default();
                request.params.temperature == TEMPERATURE
                    && request.params.temperature < tutor::TEMPERATURE
                    && request.params.max_tokens == MAX_TOKENS
                    && user.contains("User Question: how do assets work")
                    && user.contains("[Passage 1]: passage text 1\n\n[Passage 2]: passage text 2")
            })
            .times(1)
            .returning(|_| Ok("ok".to_string()));

        let agent = SearchAgent::new(context(retriever_with(2), llm));
        agent.semantic_search("how do assets work").await.unwrap();
    }

    #[tokio::test]
    async fn test_log_entries_with_results() {
        let agent = SearchAgent::new(context(retriever_with(4), llm_answering("x")));
        let reply = agent.semantic_search("mentions of fear").await.unwrap();

        let actions: Vec<&str> = reply.log.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Initiating semantic search: mentions of fear...",
                "Searching Qdrant vector database",
                "Found 4 relevant passages",
                "Generating answer with LLM",
                "Search complete",
            ]
        );
        assert_eq!(reply.log[1].qdrant_query.as_deref(), Some("mentions of fear"));
        assert!(reply.log.iter().all(|e| e.agent == AgentKind::Search));
    }

    #[tokio::test]
    async fn test_long_query_is_previewed_in_log() {
        let query = "x".repeat(80);
        let agent = SearchAgent::new(context(retriever_with(0), MockLLMClient::new()));
        let reply = agent.semantic_search(&query).await.unwrap();

        assert_eq!(
            reply.log[0].action,
            format!("Initiating semantic search: {}...", "x".repeat(50))
        );
        assert_eq!(reply.log[1].qdrant_query.as_deref(), Some(query.as_str()));
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate()
            .returning(|_| Err(GenerationError::EmptyResponse));

        let agent = SearchAgent::new(context(retriever_with(2), llm));
        assert!(agent.semantic_search("what").await.is_err());
    }
}
