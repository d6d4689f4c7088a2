//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for session
//! management and tutoring turns. It uses `utoipa` doc comments to generate
//! OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use booktutor_core::GenerationError;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    models::{
        ChatPayload, ChatResponse, ErrorResponse, LogEntry, Message, MessageRole, Progress,
        Session, StatsResponse,
    },
    state::AppState,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("The language model could not answer: {0}")]
    Upstream(#[from] GenerationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(err) => {
                error!("Response generation failed: {:?}", err);
                StatusCode::BAD_GATEWAY
            }
        };
        let message = self.to_string();
        (status, Json(ErrorResponse { message })).into_response()
    }
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session with id '{}' not found", id))
}

/// Start a new tutoring session at the first section of the book.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = Session)
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let record = state.sessions.create().await;
    Ok((
        StatusCode::CREATED,
        Json(Session::from_record(&record, &state.book)),
    ))
}

/// List all sessions, newest first.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "List of sessions", body = [Session])
    )
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let sessions = state
        .sessions
        .list()
        .await
        .iter()
        .map(|record| Session::from_record(record, &state.book))
        .collect();
    Ok(Json(sessions))
}

/// Get a specific session by its ID.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session details", body = Session),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    let entry = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(Session::from_record(&entry.snapshot(), &state.book)))
}

/// Delete a session and its history.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// Get the chat history of a session in chronological order.
#[utoipa::path(
    get,
    path = "/sessions/{id}/messages",
    responses(
        (status = 200, description = "Chat history", body = [Message]),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let entry = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(entry.snapshot().history))
}

/// Send a query to the tutor and receive its answer with the activity log.
///
/// Turns on one session are served one at a time. A failed turn leaves the
/// session and its history unchanged.
#[utoipa::path(
    post,
    path = "/sessions/{id}/messages",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Tutor reply", body = ChatResponse),
        (status = 400, description = "Empty query", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Response generation failed", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let query = payload.query;

    let entry = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    let _turn = entry.begin_turn().await;

    let session = entry.snapshot().state;
    let reply = state.orchestrator.process(&query, &session).await?;
    info!(intent = %reply.intent, entries = reply.log.len(), "Turn complete.");

    let teaching = reply.session.teaching;
    entry.update(|record| {
        record.state = reply.session;
        record.push_message(MessageRole::User, query);
        record.push_message(MessageRole::Ai, reply.response.clone());
    });

    Ok(Json(ChatResponse {
        response: reply.response,
        intent: reply.intent,
        log: reply.log.into_iter().map(LogEntry::from).collect(),
        progress: Progress::new(teaching, &state.book),
    }))
}

/// Describe the collection the tutor retrieves passages from.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Collection statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.retriever.stats().await;
    Json(StatsResponse::new(stats, &state.book))
}
