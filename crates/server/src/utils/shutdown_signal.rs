use std::future::pending;

use tokio::signal;
use tracing::{error, info};

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install is logged
/// and never fires; the other one still works.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(err) = signal::ctrl_c().await {
      error!(error = %err, "failed to install Ctrl+C handler");
      pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(err) => {
        error!(error = %err, "failed to install SIGTERM handler");
        pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }

  info!("shutdown signal received, draining connections");
}
