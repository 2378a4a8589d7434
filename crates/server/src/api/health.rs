use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
  pub status: String,
  pub timestamp: DateTime<Utc>,
  pub uptime_secs: i64,
  pub service: String,
}

#[derive(Serialize, ToSchema)]
pub struct WebhookHealth {
  pub reachable: bool,
}

/// Liveness of this service
#[utoipa::path(
  get,
  path = "/api/health",
  responses(
    (status = 200, description = "Service is up", body = HealthStatus)
  )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
  let now = Utc::now();
  Json(HealthStatus {
    status: "healthy".to_owned(),
    timestamp: now,
    uptime_secs: (now - state.started_at).num_seconds(),
    service: "IAMET Zebra Landing Page".to_owned(),
  })
}

/// Probe the automation webhook
#[utoipa::path(
  get,
  path = "/api/v0/webhook/health",
  responses(
    (status = 200, description = "Whether the webhook answered a test message", body = WebhookHealth)
  )
)]
#[axum::debug_handler]
pub async fn webhook_health(State(state): State<AppState>) -> Json<WebhookHealth> {
  Json(WebhookHealth {
    reachable: state.webhook.health_check().await,
  })
}
