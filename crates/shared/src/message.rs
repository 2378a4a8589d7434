use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
  User,
  Assistant,
}

/// Which follow-up action(s) an assistant reply should offer.
#[derive(
  Debug,
  Default,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CtaDirective {
  #[default]
  None,
  OpenMessagingLink,
  OpenSchedulingLink,
  Both,
}

impl CtaDirective {
  #[must_use]
  pub const fn from_flags(messaging: bool, scheduling: bool) -> Self {
    match (messaging, scheduling) {
      (true, true) => Self::Both,
      (true, false) => Self::OpenMessagingLink,
      (false, true) => Self::OpenSchedulingLink,
      (false, false) => Self::None,
    }
  }

  #[must_use]
  pub const fn offers_messaging(self) -> bool {
    matches!(self, Self::OpenMessagingLink | Self::Both)
  }

  #[must_use]
  pub const fn offers_scheduling(self) -> bool {
    matches!(self, Self::OpenSchedulingLink | Self::Both)
  }

  /// Union of the actions offered by both directives.
  #[must_use]
  pub const fn combine(self, other: Self) -> Self {
    Self::from_flags(
      self.offers_messaging() || other.offers_messaging(),
      self.offers_scheduling() || other.offers_scheduling(),
    )
  }
}

/// One turn of a chat conversation. Immutable once built.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct ChatMessage {
  id: Uuid,
  content: String,
  role: MessageRole,
  timestamp: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  cta_directive: Option<CtaDirective>,
}

impl ChatMessage {
  fn new(role: MessageRole, content: String, cta_directive: Option<CtaDirective>) -> Self {
    Self {
      id: Uuid::now_v7(),
      content,
      role,
      timestamp: Utc::now(),
      cta_directive,
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self::new(MessageRole::User, content.into(), None)
  }

  pub fn assistant(content: impl Into<String>, cta_directive: CtaDirective) -> Self {
    Self::new(MessageRole::Assistant, content.into(), Some(cta_directive))
  }

  pub const fn id(&self) -> Uuid {
    self.id
  }

  pub fn content(&self) -> &str {
    &self.content
  }

  pub const fn role(&self) -> MessageRole {
    self.role
  }

  pub const fn timestamp(&self) -> DateTime<Utc> {
    self.timestamp
  }

  pub const fn cta_directive(&self) -> Option<CtaDirective> {
    self.cta_directive
  }

  pub const fn is_user(&self) -> bool {
    matches!(self.role, MessageRole::User)
  }

  pub const fn is_assistant(&self) -> bool {
    matches!(self.role, MessageRole::Assistant)
  }
}
