/// Everything that can go wrong while talking to the automation webhook.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
  /// DNS, connect, TLS or body-read failure.
  #[error("webhook connection failed: {0}")]
  ConnectionFailure(#[source] reqwest::Error),

  /// The webhook answered with a non-2xx status.
  #[error("webhook returned HTTP {status_code}")]
  ServiceError { status_code: u16, raw_body: String },
}

impl DispatchError {
  #[must_use]
  pub const fn status_code(&self) -> Option<u16> {
    match self {
      Self::ConnectionFailure(_) => None,
      Self::ServiceError { status_code, .. } => Some(*status_code),
    }
  }

  #[must_use]
  pub const fn is_connection_failure(&self) -> bool {
    matches!(self, Self::ConnectionFailure(_))
  }
}
