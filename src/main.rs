use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zara_core::Catalog;
use zara_server::{server, utils::AppState};
use zara_shared::{AppConfig, AppError};

fn load_catalog(config: &AppConfig) -> Result<Catalog, AppError> {
  let Some(path) = &config.server.catalog_path else {
    warn!("CATALOG_PATH not set, serving an empty catalog");
    return Ok(Catalog::default());
  };

  let catalog = Catalog::load(path)?;
  info!(
    path = %path.display(),
    categories = catalog.categories().len(),
    products = catalog.all_products().count(),
    "catalog loaded"
  );
  Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
  dotenvy::dotenv().ok();
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
          "{}=debug,zara_core=debug,zara_server=debug,zara_webhook=debug",
          env!("CARGO_CRATE_NAME")
        )
        .into()
      }),
    )
    .with(tracing_subscriber::fmt::layer())
    .with(tracing_error::ErrorLayer::default())
    .init();

  let config = AppConfig::from_env()?;
  info!(webhook = %config.webhook.url, source = %config.webhook.source, "configuration loaded");

  let catalog = load_catalog(&config)?;

  server(AppState::new(config, catalog)).await
}
