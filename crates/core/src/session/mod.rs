use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use zara_shared::{ChatMessage, ContactConfig, CtaDirective, ServerConfig};
use zara_webhook::{DispatchError, WebhookClient};

use crate::ResponseNormalizer;

mod id;
pub use id::generate_session_id;

mod log;
pub use log::ConversationLog;

pub const SESSION_ID_PREFIX: &str = "iamet";

/// A turn that could not be completed. Nothing is logged for it.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
  #[error("Message cannot be empty")]
  EmptyMessage,
  #[error("Message too long. Maximum {max} characters allowed.")]
  MessageTooLong { max: usize },
  #[error("A message is already being processed for this session")]
  TurnInFlight,
  #[error(transparent)]
  Dispatch(#[from] DispatchError),
}

impl TurnError {
  /// Text to show the visitor. Upstream status codes and bodies never leak.
  pub fn user_facing_message(&self, contact: &ContactConfig) -> String {
    match self {
      Self::EmptyMessage | Self::MessageTooLong { .. } | Self::TurnInFlight => self.to_string(),
      Self::Dispatch(err) if err.is_connection_failure() => contact.offline_message(),
      Self::Dispatch(_) => contact.fallback_message(),
    }
  }
}

/// Trim visitor input and enforce the length limit (in characters).
pub fn validate_input(input: &str, max_chars: usize) -> Result<&str, TurnError> {
  let content = input.trim();
  if content.is_empty() {
    return Err(TurnError::EmptyMessage);
  }
  if content.chars().count() > max_chars {
    return Err(TurnError::MessageTooLong { max: max_chars });
  }
  Ok(content)
}

/// State of one mounted chat widget: its correlation id and conversation log.
///
/// At most one turn is in flight per session. The log lock is only taken to
/// read or append, never across the webhook round trip.
#[derive(Debug)]
pub struct ChatSession {
  id: String,
  log: RwLock<ConversationLog>,
  turn: Mutex<()>,
  webhook: WebhookClient,
  normalizer: Arc<ResponseNormalizer>,
  max_message_chars: usize,
}

impl ChatSession {
  /// Start a session. The log opens with the configured welcome message.
  pub fn new(
    webhook: WebhookClient,
    normalizer: Arc<ResponseNormalizer>,
    config: &ServerConfig,
  ) -> Self {
    let mut log = ConversationLog::new();
    log.push(ChatMessage::assistant(
      config.welcome_message.clone(),
      CtaDirective::None,
    ));

    Self {
      id: generate_session_id(SESSION_ID_PREFIX),
      log: RwLock::new(log),
      turn: Mutex::new(()),
      webhook,
      normalizer,
      max_message_chars: config.max_message_chars,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Snapshot of the conversation log, oldest first.
  pub async fn messages(&self) -> Vec<ChatMessage> {
    self.log.read().await.messages().to_vec()
  }

  pub async fn history_len(&self) -> usize {
    self.log.read().await.len()
  }

  /// Send one visitor message and record the exchange.
  ///
  /// The user turn and the assistant turn are appended together, and only
  /// when the webhook answered. A second call while one is pending fails
  /// with [`TurnError::TurnInFlight`].
  pub async fn submit(&self, input: &str) -> Result<ChatMessage, TurnError> {
    let content = validate_input(input, self.max_message_chars)?;
    let _turn = self.turn.try_lock().map_err(|_| TurnError::TurnInFlight)?;
    let user_message = ChatMessage::user(content);

    let raw = self.webhook.send(content, &self.id).await.inspect_err(|err| {
      warn!(session_id = %self.id, error = %err, "chat turn failed");
    })?;

    let reply = self.normalizer.normalize(&raw);
    let assistant_message = ChatMessage::assistant(reply.display_text, reply.cta_directive);

    let turns = {
      let mut log = self.log.write().await;
      log.push(user_message);
      log.push(assistant_message.clone());
      log.len()
    };

    info!(
      session_id = %self.id,
      cta = %reply.cta_directive,
      turns,
      "chat turn completed"
    );

    Ok(assistant_message)
  }
}
