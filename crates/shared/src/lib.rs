mod error;
pub use error::AppError;

mod config;
pub use config::{AppConfig, ContactConfig, ServerConfig, WebhookConfig};
pub use config::{
  DEFAULT_LISTEN_ADDR, DEFAULT_MAX_MESSAGE_CHARS, DEFAULT_SESSION_IDLE_TIMEOUT, DEFAULT_WEBHOOK_SOURCE,
};

mod message;
pub use message::{ChatMessage, CtaDirective, MessageRole};
