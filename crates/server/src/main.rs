use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use godon_core::{
    load_config, validate_config, CinemetaClient, ContentInspector, IdMapper, JackettSearcher,
    KitsuMapper, MetadataProvider, Searcher, SqliteStreamCache, StreamCache, StreamResolver,
    TorrentInspector,
};
use godon_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    let json_logs = std::env::var("GODON_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    info!("GoDon {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("GODON_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    match config.resolver.result_cap() {
        Some(cap) => info!("Inspecting at most {} candidates per request", cap),
        None => info!("Candidate cap disabled"),
    }

    // Create stream cache
    let cache: Arc<dyn StreamCache> = Arc::new(
        SqliteStreamCache::new(&config.database.path)
            .context("Failed to create stream cache")?,
    );
    info!("Stream cache initialized");

    // Create searcher
    info!(
        "Initializing Jackett searcher at {} (indexer: {})",
        config.jackett.url, config.jackett.indexer
    );
    let searcher: Arc<dyn Searcher> = Arc::new(
        JackettSearcher::new(config.jackett.clone()).context("Failed to create Jackett searcher")?,
    );

    // Create metadata services
    let metadata: Arc<dyn MetadataProvider> = Arc::new(
        CinemetaClient::new(&config.metadata).context("Failed to create Cinemeta client")?,
    );
    let id_mapper: Arc<dyn IdMapper> = Arc::new(
        KitsuMapper::new(&config.metadata).context("Failed to create Kitsu mapper")?,
    );
    info!("Metadata services initialized");

    // Create content inspector (embedded librqbit session, list-only)
    info!(
        "Initializing content inspector (session dir: {:?})",
        config.content.session_dir
    );
    let inspector: Arc<dyn ContentInspector> = Arc::new(
        TorrentInspector::new(
            &config.content,
            Duration::from_secs(config.resolver.content_timeout_secs),
        )
        .await
        .context("Failed to create content inspector")?,
    );

    let resolver = Arc::new(StreamResolver::new(
        searcher,
        inspector,
        metadata,
        id_mapper,
        cache,
        config.resolver.clone(),
        config.streams.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(resolver));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
