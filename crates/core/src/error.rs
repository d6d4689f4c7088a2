use async_openai::error::OpenAIError;

/// Failure reasons reported by the generation collaborator.
///
/// Agents never catch these; they travel unchanged through the orchestrator
/// to whichever surface started the turn.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request could not be built, sent, or was rejected by the provider
    /// (auth, quota, network).
    #[error("LLM provider error: {0}")]
    Provider(#[from] OpenAIError),
    /// The provider answered without any text content.
    #[error("LLM response had no text content")]
    EmptyResponse,
}
