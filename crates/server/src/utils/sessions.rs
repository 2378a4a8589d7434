use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::RwLock, time::Instant};
use tracing::debug;
use zara_core::ChatSession;

pub type SharedSession = Arc<ChatSession>;

struct Slot {
  session: SharedSession,
  last_seen: Instant,
}

impl Slot {
  /// Idle past the timeout and not held by any request.
  fn is_expired(&self, idle_timeout: Duration) -> bool {
    self.last_seen.elapsed() >= idle_timeout && Arc::strong_count(&self.session) == 1
  }
}

/// In-memory sessions keyed by session id. Dropped on restart.
///
/// A widget that is closed never says goodbye, so sessions untouched for
/// `idle_timeout` are evicted on every insert and by [`Self::evict_idle`].
#[derive(Clone)]
pub struct SessionStore {
  inner: Arc<RwLock<HashMap<String, Slot>>>,
  idle_timeout: Duration,
}

impl SessionStore {
  pub fn new(idle_timeout: Duration) -> Self {
    Self {
      inner: Arc::default(),
      idle_timeout,
    }
  }

  pub const fn idle_timeout(&self) -> Duration {
    self.idle_timeout
  }

  pub async fn insert(&self, session: ChatSession) -> SharedSession {
    let id = session.id().to_owned();
    let shared = Arc::new(session);

    let mut sessions = self.inner.write().await;
    Self::evict_expired(&mut sessions, self.idle_timeout);
    sessions.insert(
      id,
      Slot {
        session: Arc::clone(&shared),
        last_seen: Instant::now(),
      },
    );
    shared
  }

  /// Look a session up and mark it as active.
  pub async fn get(&self, id: &str) -> Option<SharedSession> {
    let mut sessions = self.inner.write().await;
    let slot = sessions.get_mut(id)?;
    slot.last_seen = Instant::now();
    Some(Arc::clone(&slot.session))
  }

  /// Returns whether a session was removed.
  pub async fn remove(&self, id: &str) -> bool {
    self.inner.write().await.remove(id).is_some()
  }

  /// Drop idle sessions; returns how many were evicted.
  pub async fn evict_idle(&self) -> usize {
    Self::evict_expired(&mut *self.inner.write().await, self.idle_timeout)
  }

  pub async fn len(&self) -> usize {
    self.inner.read().await.len()
  }

  fn evict_expired(sessions: &mut HashMap<String, Slot>, idle_timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, slot| !slot.is_expired(idle_timeout));
    let evicted = before - sessions.len();
    if evicted > 0 {
      debug!(evicted, remaining = sessions.len(), "evicted idle chat sessions");
    }
    evicted
  }
}
