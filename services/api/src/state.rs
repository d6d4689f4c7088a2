//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the orchestrator,
//! the collaborators it was built from, and the session store.

use crate::store::SessionStore;
use booktutor_core::{
    Orchestrator, agents::AgentContext, book::BookProfile, retrieval::Retriever,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub retriever: Arc<dyn Retriever>,
    pub book: Arc<BookProfile>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(ctx: AgentContext) -> Self {
        Self {
            retriever: ctx.retriever.clone(),
            book: ctx.book.clone(),
            orchestrator: Arc::new(Orchestrator::new(ctx)),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
