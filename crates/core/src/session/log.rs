use zara_shared::ChatMessage;

/// Ordered, append-only record of one widget session.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
  messages: Vec<ChatMessage>,
}

impl ConversationLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, message: ChatMessage) {
    self.messages.push(message);
  }

  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  pub fn last(&self) -> Option<&ChatMessage> {
    self.messages.last()
  }

  pub fn len(&self) -> usize {
    self.messages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }
}
