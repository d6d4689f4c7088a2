pub mod activity;
pub mod agents;
pub mod book;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm_client;
pub mod prompts;
pub mod retrieval;
pub mod session;

pub use agents::orchestrator::{Orchestrator, Reply};
pub use error::GenerationError;
pub use intent::Intent;
pub use session::{SessionState, TeachingProgress};
