use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, anyhow};

use crate::AppError;

pub const DEFAULT_WEBHOOK_SOURCE: &str = "IAMET-Zebra-Chat";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 1000;
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const DEFAULT_WELCOME_MESSAGE: &str = "¡Hola! Soy Zara 🦓, tu especialista en soluciones Zebra para IAMET en Tijuana.\n\n¿En qué puedo ayudarte hoy?";

/// Outbound automation webhook.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
  pub url: String,
  /// Constant sent as `source` so the automation side can tell widgets apart.
  pub source: String,
}

/// Direct contact channels offered to visitors.
///
/// Every field is optional: helpers that build links from these values
/// degrade to a placeholder instead of failing.
#[derive(Debug, Clone, Default)]
pub struct ContactConfig {
  /// WhatsApp number in international format, e.g. `5216647880797`.
  pub whatsapp_number: Option<String>,
  pub calendly_url: Option<String>,
  /// Human readable phone, e.g. `+52 664 788 0797`.
  pub phone: Option<String>,
  pub email: Option<String>,
}

impl ContactConfig {
  /// Canned reply used when a webhook answer can't be turned into text.
  #[must_use]
  pub fn fallback_message(&self) -> String {
    self.with_channels("Disculpa, tengo problemas técnicos momentáneos.\n\n📱 Contáctanos directamente:")
  }

  /// Reply shown when the webhook could not be reached at all.
  #[must_use]
  pub fn offline_message(&self) -> String {
    self.with_channels("Sin conexión al servidor.\n\n📱 Contáctanos:")
  }

  fn with_channels(&self, header: &str) -> String {
    let mut out = String::from(header);
    let whatsapp = self.phone.as_deref().or(self.whatsapp_number.as_deref());
    let mut any = false;

    if let Some(whatsapp) = whatsapp {
      out.push_str(&format!("\nWhatsApp: {whatsapp}"));
      any = true;
    }
    if let Some(phone) = &self.phone {
      out.push_str(&format!("\nLlamada: {phone}"));
    }
    if let Some(email) = &self.email {
      out.push_str(&format!("\nEmail: {email}"));
      any = true;
    }
    if !any {
      out.push_str("\nPor favor intenta de nuevo en unos minutos.");
    }
    out
  }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub listen_addr: SocketAddr,
  /// JSON catalog file. `None` serves an empty catalog.
  pub catalog_path: Option<PathBuf>,
  pub max_message_chars: usize,
  pub welcome_message: String,
  /// Sessions untouched for this long are discarded.
  pub session_idle_timeout: Duration,
}

/// Process configuration, built once at startup and handed to whoever needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub webhook: WebhookConfig,
  pub contact: ContactConfig,
  pub server: ServerConfig,
}

impl AppConfig {
  /// Read configuration from the process environment.
  pub fn from_env() -> Result<Self, AppError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Build configuration from an arbitrary key lookup.
  ///
  /// Blank values are treated as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| {
      lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
    };

    let webhook = WebhookConfig {
      url: get("WEBHOOK_URL").ok_or_else(|| anyhow!("WEBHOOK_URL must be set"))?,
      source: get("WEBHOOK_SOURCE").unwrap_or_else(|| DEFAULT_WEBHOOK_SOURCE.to_owned()),
    };

    let contact = ContactConfig {
      whatsapp_number: get("WHATSAPP_NUMBER"),
      calendly_url: get("CALENDLY_URL"),
      phone: get("CONTACT_PHONE"),
      email: get("CONTACT_EMAIL"),
    };

    let listen_addr = get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
    let listen_addr = listen_addr
      .parse::<SocketAddr>()
      .with_context(|| format!("invalid LISTEN_ADDR: {listen_addr}"))?;

    let max_message_chars = match get("MAX_MESSAGE_CHARS") {
      Some(raw) => raw
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| anyhow!("MAX_MESSAGE_CHARS must be a positive integer, got {raw}"))?,
      None => DEFAULT_MAX_MESSAGE_CHARS,
    };

    let session_idle_timeout = match get("SESSION_IDLE_TIMEOUT_SECS") {
      Some(raw) => raw
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow!("SESSION_IDLE_TIMEOUT_SECS must be a positive integer, got {raw}"))?,
      None => DEFAULT_SESSION_IDLE_TIMEOUT,
    };

    let server = ServerConfig {
      listen_addr,
      catalog_path: get("CATALOG_PATH").map(PathBuf::from),
      max_message_chars,
      welcome_message: get("WELCOME_MESSAGE").unwrap_or_else(|| DEFAULT_WELCOME_MESSAGE.to_owned()),
      session_idle_timeout,
    };

    Ok(Self {
      webhook,
      contact,
      server,
    })
  }
}
