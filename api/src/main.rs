use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use atlas_api::{create_app, telemetry, AppState};
use atlas_core::repositories::RevocationStore;
use atlas_infra::{
    BcryptPasswordHasher, MemoryIdentityRepository, MemoryRevocationStore, RedisRevocationStore,
};
use atlas_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting Atlas auth service");
    if config.auth.jwt.is_using_default_secret() {
        warn!("Using the default JWT secret; set ATLAS__AUTH__JWT__SECRET");
    }

    let store = revocation_store(&config).await?;
    let state = AppState::new(
        store,
        Arc::new(MemoryIdentityRepository::new()),
        Arc::new(BcryptPasswordHasher::default()),
        &config.auth,
    )
    .context("Invalid token configuration")?;
    let state = web::Data::new(state);

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let cors = config.cors.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &cors));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server terminated with an error")
}

/// Redis in every environment; development falls back to process memory when
/// Redis is unreachable
async fn revocation_store(config: &AppConfig) -> anyhow::Result<Arc<dyn RevocationStore>> {
    match RedisRevocationStore::connect(config.cache.clone()).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if config.environment.is_development() => {
            warn!(error = %e, "Redis unavailable, using in-memory revocation store");
            Ok(Arc::new(MemoryRevocationStore::new()))
        }
        Err(e) => Err(e).context("Failed to connect to the revocation store"),
    }
}
