//! voxsite-web - Voice-over portfolio site server
//!
//! Serves the audio demo catalog (grouped by speaker), the audio
//! upload/delete management endpoints, the services list with
//! drag-reorder persistence, editable site text, and the SSE change
//! feed the public page and admin panel subscribe to.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use voxsite_common::config::{RootFolderInitializer, RootFolderResolver};
use voxsite_common::events::EventBus;
use voxsite_web::catalog::{CatalogRefresher, CatalogStore, FileLister};
use voxsite_web::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "voxsite-web", about = "Voice-over portfolio site server")]
struct Args {
    /// Root folder holding the database and audios tree
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(long, default_value_t = 5080)]
    port: u16,

    /// Remote listing endpoint consulted before the local folder scan
    #[arg(long, env = "VOXSITE_LISTING_URL")]
    listing_url: Option<String>,

    /// Seconds between automatic catalog refresh cycles
    #[arg(long, default_value_t = 5)]
    refresh_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting VoxSite (voxsite-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // Root folder resolution: CLI arg → env → config file → OS default
    let resolver = RootFolderResolver::new(args.root_folder);
    let root_folder = resolver.resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directories_exist()?;
    info!("Root folder: {}", initializer.root().display());

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = voxsite_common::db::init_database_pool(&db_path).await?;

    let event_bus = EventBus::new(100);

    // Catalog subsystem: lister chain + persisted store + refresher
    let lister = FileLister::new(
        initializer.audios_path(),
        initializer.manifest_path(),
        args.listing_url,
    );
    let store = CatalogStore::new(db_pool.clone());
    let refresher = Arc::new(CatalogRefresher::new(
        lister,
        store,
        event_bus.clone(),
        Duration::from_secs(args.refresh_seconds.max(1)),
    ));

    // Initial reconciliation so the first request sees a catalog
    match refresher.refresh_once().await {
        Ok(catalog) => info!("Initial catalog reconciled: {} entries", catalog.len()),
        Err(e) => warn!("Initial catalog refresh failed: {}", e),
    }

    // Periodic refresh task, cancelled on shutdown
    let shutdown_token = CancellationToken::new();
    let refresher_task = {
        let refresher = refresher.clone();
        let token = shutdown_token.clone();
        tokio::spawn(async move { refresher.run(token).await })
    };

    let state = AppState::new(
        db_pool,
        event_bus,
        refresher,
        initializer.audios_path(),
        initializer.manifest_path(),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("Listening on http://{}:{}", args.host, args.port);
    info!("Health check: http://{}:{}/health", args.host, args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown({
            let token = shutdown_token.clone();
            async move {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
                token.cancel();
            }
        })
        .await?;

    // Make sure the refresher is gone before the pool drops
    shutdown_token.cancel();
    let _ = refresher_task.await;

    Ok(())
}
