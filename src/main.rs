use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use ecommerce_catalog::app::{build_app, AppState};
use ecommerce_catalog::config::{load_config, locate_config, Config, StorageBackend};
use ecommerce_catalog::infrastructure::file_storage::LocalFileStorage;
use ecommerce_catalog::infrastructure::logger::Logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = locate_config();
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

    Logger::init(&config.logging.level);
    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    let state = build_state(&config).await.map_err(|e| {
        error!("Failed to initialize storage: {:#}", e);
        e
    })?;
    let app = build_app(state, &config);

    let listener = TcpListener::bind((config.http.bind_address.as_str(), config.http.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.http.bind_address, config.http.port
            )
        })?;
    let addr = listener.local_addr()?;

    info!("🚀 Catalog server running on http://{}", addr);
    info!("   GET    /api/public/categories");
    info!("   POST   /api/public/categories");
    info!("   PUT    /api/public/categories/:category_id");
    info!("   DELETE /api/admin/categories/:category_id");
    info!("   POST   /api/admin/categories/:category_id/product");
    info!("   GET    /api/public/products");
    info!("   GET    /api/public/categories/:category_id/products");
    info!("   GET    /api/public/products/keyword/:keyword");
    info!("   PUT    /api/admin/products/:product_id");
    info!("   DELETE /api/admin/products/:product_id");
    info!("   PUT    /api/product/:product_id/image");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Catalog server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let image_dir = config.storage.image_dir.clone();

    match config.database.backend {
        StorageBackend::Memory => {
            info!("Using in-memory catalog store");
            Ok(AppState::in_memory(image_dir))
        }
        #[cfg(feature = "database")]
        StorageBackend::Postgres => {
            use ecommerce_catalog::infrastructure::database::DatabaseManager;
            use ecommerce_catalog::infrastructure::postgres_store::PgCatalogStore;

            let db = DatabaseManager::new(&config.database).await?;
            db.create_tables().await?;

            let store = Arc::new(PgCatalogStore::new(db.get_pool().clone()));
            Ok(AppState::new(
                store.clone(),
                store,
                Arc::new(LocalFileStorage),
                image_dir,
            ))
        }
        #[cfg(not(feature = "database"))]
        StorageBackend::Postgres => {
            anyhow::bail!("postgres backend requires the `database` feature")
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
