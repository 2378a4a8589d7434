use std::time::Duration;

use axum::{Router, response::Html, routing::get};
use tokio::{net::TcpListener, time::interval};
use zara_shared::AppError;

use crate::{
  api,
  utils::{AppState, SessionStore, shutdown_signal},
};

const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[axum::debug_handler]
async fn handler() -> Html<&'static str> {
  Html("<h1>Zara</h1>")
}

/// Full application router, state included.
pub fn router(app_state: AppState) -> Router {
  Router::new()
    .route("/", get(handler))
    .merge(api::app())
    .with_state(app_state)
}

/// Periodically evict idle sessions, so a quiet server frees memory too.
fn spawn_session_sweeper(sessions: SessionStore) {
  let period = sessions.idle_timeout().min(MAX_SWEEP_INTERVAL);
  tokio::spawn(async move {
    let mut ticks = interval(period);
    loop {
      ticks.tick().await;
      sessions.evict_idle().await;
    }
  });
}

pub async fn server(app_state: AppState) -> Result<(), AppError> {
  let addr = app_state.config.server.listen_addr;
  spawn_session_sweeper(app_state.sessions.clone());
  let app = router(app_state);

  let listener = TcpListener::bind(addr).await?;

  tracing::info!("server started at http://{addr}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}
