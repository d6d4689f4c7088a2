use crate::error::GenerationError;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Speaker of a message in a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A single chat-completion request: ordered messages plus sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ConversationMessage>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// The usual agent request shape: one system message, then one user turn.
    pub fn new(system: String, user: String, params: GenerationParams) -> Self {
        Self {
            messages: vec![
                ConversationMessage::system(system),
                ConversationMessage::user(user),
            ],
            params,
        }
    }

    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// A generic client for a hosted text-generation model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Makes a single, non-streaming completion call and returns its text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config),
        }
    }
}

fn to_openai_message(
    message: ConversationMessage,
) -> Result<ChatCompletionRequestMessage, GenerationError> {
    let message = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
    };
    Ok(message)
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    #[instrument(skip_all, fields(model = %request.params.model))]
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let GenerationRequest { messages, params } = request;
        let messages = messages
            .into_iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&params.model)
            .messages(messages)
            .temperature(params.temperature)
            .max_completion_tokens(params.max_tokens)
            .build()?;

        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;
        debug!(choices = response.choices.len(), "Received completion");

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
