use anyhow::anyhow;
use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header::USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use zara_core::{ConversationFlow, CtaAction, TurnError, classify, validate_input};
use zara_shared::{AppError, ChatMessage, CtaDirective};

use crate::utils::AppState;

const CRAWLER_MARKERS: [&str; 3] = ["bot", "crawler", "spider"];

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
  pub session_id: String,
  pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatReply {
  /// Assistant turn to render.
  pub message: ChatMessage,
  /// Buttons to render under the message.
  pub actions: Vec<CtaAction>,
  pub flow: ConversationFlow,
  /// `false` when the webhook failed; `message` then carries a fallback
  /// that is not part of the conversation log.
  pub delivered: bool,
}

fn is_automated(headers: &HeaderMap) -> bool {
  headers
    .get(USER_AGENT)
    .and_then(|value| value.to_str().ok())
    .map(str::to_lowercase)
    .is_some_and(|agent| CRAWLER_MARKERS.iter().any(|marker| agent.contains(marker)))
}

/// Send a visitor message and get the assistant reply
#[utoipa::path(
  post,
  path = "/api/v0/chat",
  request_body = ChatRequest,
  responses(
    (status = 200, description = "Assistant reply, or a fallback when `delivered` is false", body = ChatReply),
    (status = 400, description = "Message is empty or too long"),
    (status = 403, description = "Automated requests not allowed"),
    (status = 404, description = "Unknown session"),
    (status = 409, description = "A turn is already in flight for this session")
  )
)]
#[axum::debug_handler]
pub async fn chat(
  State(state): State<AppState>,
  headers: HeaderMap,
  Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
  if is_automated(&headers) {
    return Err(AppError::with_status(
      StatusCode::FORBIDDEN,
      anyhow!("Automated requests not allowed"),
    ));
  }

  let content = validate_input(&payload.message, state.config.server.max_message_chars)
    .map_err(AppError::bad_request)?;

  let session = state
    .sessions
    .get(&payload.session_id)
    .await
    .ok_or_else(|| AppError::not_found(format!("Unknown session {}", payload.session_id)))?;

  let flow = classify(content, session.history_len().await, &state.catalog);

  match session.submit(content).await {
    Ok(message) => {
      let directive = message.cta_directive().unwrap_or_default();
      let actions = state.links.actions_for(directive, Some(message.content()));
      Ok(Json(ChatReply {
        message,
        actions,
        flow,
        delivered: true,
      }))
    }
    Err(err @ TurnError::Dispatch(_)) => {
      info!(session_id = %session.id(), "answering with contact fallback");
      let text = err.user_facing_message(&state.config.contact);
      Ok(Json(ChatReply {
        message: ChatMessage::assistant(text, CtaDirective::None),
        actions: state.links.actions_for(CtaDirective::OpenMessagingLink, None),
        flow,
        delivered: false,
      }))
    }
    Err(err @ TurnError::TurnInFlight) => Err(AppError::with_status(StatusCode::CONFLICT, err)),
    Err(err) => {
      warn!(session_id = %session.id(), error = %err, "rejected chat input");
      Err(AppError::bad_request(err))
    }
  }
}
