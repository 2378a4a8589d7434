use std::sync::Arc;

use chrono::{DateTime, Utc};
use zara_core::{Catalog, ChatSession, ContactLinks, ResponseNormalizer};
use zara_shared::AppConfig;
use zara_webhook::WebhookClient;

use super::{SessionStore, SharedSession};

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub webhook: WebhookClient,
  pub normalizer: Arc<ResponseNormalizer>,
  pub links: Arc<ContactLinks>,
  pub catalog: Arc<Catalog>,
  pub sessions: SessionStore,
  pub started_at: DateTime<Utc>,
}

impl AppState {
  #[must_use]
  pub fn new(config: AppConfig, catalog: Catalog) -> Self {
    Self {
      webhook: WebhookClient::new(&config.webhook),
      normalizer: Arc::new(ResponseNormalizer::from_contact(&config.contact)),
      links: Arc::new(ContactLinks::new(&config.contact)),
      catalog: Arc::new(catalog),
      sessions: SessionStore::new(config.server.session_idle_timeout),
      started_at: Utc::now(),
      config: Arc::new(config),
    }
  }

  /// Open a new chat session and register it.
  pub async fn start_session(&self) -> SharedSession {
    let session = ChatSession::new(
      self.webhook.clone(),
      Arc::clone(&self.normalizer),
      &self.config.server,
    );
    self.sessions.insert(session).await
  }
}
