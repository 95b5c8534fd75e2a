//! OpenSASE Storefront - product discovery service

use anyhow::Result;
use opensase_storefront::{
    api::{self, AppState},
    source::{CatalogBackend, PostgresCatalog, RestCatalog, StaticCatalog},
    Backend, Config, ResilientSource,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_source(config: &Config) -> Result<ResilientSource> {
    let fallback: Arc<dyn CatalogBackend> = Arc::new(StaticCatalog::bundled());
    let primary: Option<Arc<dyn CatalogBackend>> = match &config.backend {
        // lazy pool: an unreachable database degrades to fallback data instead of blocking startup
        Backend::Postgres { url, max_connections } => {
            let db = PgPoolOptions::new().max_connections(*max_connections).acquire_timeout(config.remote_timeout).connect_lazy(url)?;
            Some(Arc::new(PostgresCatalog::new(db)))
        }
        Backend::Rest { url, api_key } => Some(Arc::new(RestCatalog::new(url.clone(), api_key.clone(), config.remote_timeout)?)),
        Backend::Static => None,
    };
    let source = match primary {
        Some(primary) => ResilientSource::new(primary, fallback),
        None => ResilientSource::fallback_only(fallback),
    };
    Ok(source.with_timeout(config.remote_timeout))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let source = build_source(&config)?;
    tracing::info!(?source, "Catalog source configured");

    let app = api::router(AppState::new(Arc::new(source)).with_similar_limit(config.similar_limit));
    tracing::info!("🚀 OpenSASE Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
