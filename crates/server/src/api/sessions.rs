use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use zara_shared::{AppError, ChatMessage};

use crate::utils::AppState;

#[derive(Serialize, ToSchema)]
pub struct SessionView {
  pub session_id: String,
  pub messages: Vec<ChatMessage>,
}

/// Start a chat session
#[utoipa::path(
  post,
  path = "/api/v0/sessions",
  responses(
    (status = 201, description = "Session created with its welcome message", body = SessionView)
  )
)]
#[axum::debug_handler]
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
  let session = state.start_session().await;

  info!(session_id = %session.id(), "chat session started");

  (
    StatusCode::CREATED,
    Json(SessionView {
      session_id: session.id().to_owned(),
      messages: session.messages().await,
    }),
  )
}

/// Conversation log of a session, oldest first
#[utoipa::path(
  get,
  path = "/api/v0/sessions/{session_id}/messages",
  params(("session_id" = String, Path, description = "Session id")),
  responses(
    (status = 200, description = "Conversation log", body = SessionView),
    (status = 404, description = "Unknown session")
  )
)]
#[axum::debug_handler]
pub async fn session_messages(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
  let session = state
    .sessions
    .get(&session_id)
    .await
    .ok_or_else(|| AppError::not_found(format!("Unknown session {session_id}")))?;

  Ok(Json(SessionView {
    session_id,
    messages: session.messages().await,
  }))
}

/// End a session and discard its log
#[utoipa::path(
  delete,
  path = "/api/v0/sessions/{session_id}",
  params(("session_id" = String, Path, description = "Session id")),
  responses(
    (status = 204, description = "Session ended"),
    (status = 404, description = "Unknown session")
  )
)]
#[axum::debug_handler]
pub async fn end_session(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
  if !state.sessions.remove(&session_id).await {
    return Err(AppError::not_found(format!("Unknown session {session_id}")));
  }

  info!(%session_id, "chat session ended");
  Ok(StatusCode::NO_CONTENT)
}
