use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};
use zara_shared::WebhookConfig;

use crate::DispatchError;

/// JSON body posted to the automation webhook for every visitor message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest<'a> {
  pub message: &'a str,
  pub session_id: &'a str,
  /// ISO-8601 UTC with millisecond precision.
  pub timestamp: String,
  pub source: &'a str,
}

impl<'a> WebhookRequest<'a> {
  pub fn new(message: &'a str, session_id: &'a str, source: &'a str) -> Self {
    Self {
      message,
      session_id,
      timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
      source,
    }
  }
}

/// Best-effort client for the external automation webhook.
///
/// One POST per call: no retries, no backoff and no timeout beyond the
/// transport default. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct WebhookClient {
  http: Client,
  url: String,
  source: String,
}

impl WebhookClient {
  pub fn new(config: &WebhookConfig) -> Self {
    Self::with_client(Client::new(), config)
  }

  pub fn with_client(http: Client, config: &WebhookConfig) -> Self {
    Self {
      http,
      url: config.url.clone(),
      source: config.source.clone(),
    }
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  /// Forward a visitor message and return the raw reply body.
  ///
  /// An empty 2xx body is returned as an empty string.
  pub async fn send(&self, message: &str, session_id: &str) -> Result<String, DispatchError> {
    let request = WebhookRequest::new(message, session_id, &self.source);

    debug!(url = %self.url, session_id, chars = message.chars().count(), "dispatching message to webhook");

    let resp = self
      .http
      .post(&self.url)
      .json(&request)
      .send()
      .await
      .map_err(|err| {
        warn!(url = %self.url, session_id, error = %err, "webhook unreachable");
        DispatchError::ConnectionFailure(err)
      })?;

    let status = resp.status();
    if !status.is_success() {
      let raw_body = resp.text().await.unwrap_or_default();
      warn!(url = %self.url, session_id, status = status.as_u16(), "webhook returned an error status");
      return Err(DispatchError::ServiceError {
        status_code: status.as_u16(),
        raw_body,
      });
    }

    let body = resp.text().await.map_err(DispatchError::ConnectionFailure)?;
    debug!(session_id, status = status.as_u16(), bytes = body.len(), "webhook replied");

    Ok(body)
  }

  /// Probe the webhook with a test payload. Never fails, only reports.
  pub async fn health_check(&self) -> bool {
    let result = self
      .http
      .post(&self.url)
      .json(&json!({ "message": "health-check", "test": true }))
      .send()
      .await;

    match result {
      Ok(resp) => {
        let healthy = resp.status().is_success();
        debug!(url = %self.url, status = resp.status().as_u16(), healthy, "webhook health check");
        healthy
      }
      Err(err) => {
        warn!(url = %self.url, error = %err, "webhook health check failed");
        false
      }
    }
  }
}
