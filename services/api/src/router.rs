//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ChatPayload, ChatResponse, ErrorResponse, LogEntry, Message, MessageRole, Progress,
        Session, StatsResponse,
    },
    state::AppState,
};

use axum::{Router, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_session,
        handlers::list_sessions,
        handlers::get_session,
        handlers::delete_session,
        handlers::get_messages,
        handlers::send_message,
        handlers::get_stats,
    ),
    components(
        schemas(Session, Progress, Message, MessageRole, ChatPayload, ChatResponse, LogEntry, StatsResponse, ErrorResponse)
    ),
    tags(
        (name = "Book Tutor API", description = "Tutoring sessions over a single book: teaching, search and quizzes")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/sessions/{id}/messages",
            get(handlers::get_messages).post(handlers::send_message),
        )
        .route("/stats", get(handlers::get_stats))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
