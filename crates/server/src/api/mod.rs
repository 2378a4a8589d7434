use axum::{
  Json, Router,
  routing::{delete, get, post},
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::utils::AppState;

mod catalog;
mod chat;
mod health;
mod sessions;

pub use chat::{ChatReply, ChatRequest};
pub use health::{HealthStatus, WebhookHealth};
pub use sessions::SessionView;

#[derive(OpenApi)]
#[openapi(
  info(
    title = "Zara API",
    version = "0.0.1",
    description = "Chat gateway for the IAMET Zebra landing page assistant"
  ),
  paths(
    health::health,
    health::webhook_health,
    sessions::create_session,
    sessions::session_messages,
    sessions::end_session,
    chat::chat,
    catalog::list_categories,
    catalog::get_category,
  ),
  components(schemas(
    ChatRequest,
    ChatReply,
    HealthStatus,
    WebhookHealth,
    SessionView,
    zara_core::Category,
    zara_core::CategoryContents,
    zara_core::Product,
    zara_core::Subcategory,
    zara_core::ConversationFlow,
    zara_core::ConversationKind,
    zara_core::ConversationStage,
    zara_core::NextAction,
    zara_core::CtaAction,
    zara_core::CtaActionKind,
    zara_shared::ChatMessage,
    zara_shared::MessageRole,
    zara_shared::CtaDirective,
  ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}

pub fn app() -> Router<AppState> {
  Router::new()
    .route("/api/health", get(health::health))
    .route("/api/v0/webhook/health", get(health::webhook_health))
    .route("/api/v0/sessions", post(sessions::create_session))
    .route(
      "/api/v0/sessions/{session_id}/messages",
      get(sessions::session_messages),
    )
    .route("/api/v0/sessions/{session_id}", delete(sessions::end_session))
    .route("/api/v0/chat", post(chat::chat))
    .route("/api/v0/categories", get(catalog::list_categories))
    .route("/api/v0/categories/{slug}", get(catalog::get_category))
    .route("/openapi.json", get(openapi_json))
    .merge(Scalar::with_url("/openapi/", ApiDoc::openapi()))
}
