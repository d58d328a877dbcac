//! munind — Munin daemon.
//!
//! Serves the caching front-end over HTTP: the operation API on one
//! listener and Prometheus metrics on a second, typically private, one.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use prometheus::Registry;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use munin::MuninError;
use munin::config::{Config, Secrets};
use munin::generate::OpenAiGenerator;
use munin::limiter::RateLimiter;
use munin::pipeline::Orchestrator;
use munin::server::shutdown::{self, Shutdown};
use munin::server::{self, AppState};
use munin::store::PgCacheStore;
use munin::telemetry::Metrics;

/// Munin daemon — caching front-end for generative text operations.
#[derive(Parser)]
#[command(name = "munind")]
#[command(version = munin::PKG_VERSION)]
#[command(about = "Munin caching text service daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("munin=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    // Load and validate configuration
    let config = Config::load(args.config.as_deref())?;
    config.validate()?;
    let secrets = Secrets::load()?;

    let api_key = secrets
        .api_key()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            MuninError::Configuration(
                "backend API key is required ([backend].api_key in secrets.toml or MUNIN_API_KEY)"
                    .to_string(),
            )
        })?;
    let database_url = secrets.database_url(&config).ok_or_else(|| {
        MuninError::Configuration(
            "database URL is required ([database] in secrets.toml, DATABASE_URL, or [database].url)"
                .to_string(),
        )
    })?;

    // Wire the pipeline
    let registry = Registry::new();
    let metrics = Metrics::new(&registry)?;

    let store = Arc::new(PgCacheStore::connect(&database_url, &config.database).await?);
    store.ensure_schema().await?;
    info!("cache store ready");

    let generator = OpenAiGenerator::new(&config.backend, api_key)?;
    info!(
        base_url = %config.backend.base_url,
        model = %config.backend.model,
        "backend configured"
    );

    let limiter = if config.rate_limit.enabled {
        info!(
            rate = config.rate_limit.rate,
            burst = config.rate_limit.burst,
            "rate limiting enabled"
        );
        Some(RateLimiter::new(
            config.rate_limit.rate,
            config.rate_limit.burst,
            config.rate_limit.idle_ttl(),
        ))
    } else {
        info!("rate limiting disabled");
        None
    };

    let orchestrator = Orchestrator::new(
        store.clone(),
        Arc::new(generator),
        config.prompts.clone(),
        metrics,
        config.server.max_param_len,
    );

    let state = Arc::new(AppState {
        orchestrator,
        limiter,
        identity_header: config.rate_limit.identity_header_name()?,
        max_url_len: config.server.max_url_len,
    });

    // Bind both listeners before reporting ready
    let api_addr = config.api_addr()?;
    let metrics_addr = config.metrics_addr()?;
    let api_listener = TcpListener::bind(api_addr).await?;
    let metrics_listener = TcpListener::bind(metrics_addr).await?;

    info!(
        version = munin::version_string(),
        %api_addr,
        %metrics_addr,
        "munind starting"
    );

    let shutdown = Shutdown::new();
    let api_server = axum::serve(
        api_listener,
        server::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.subscribe().wait());
    let metrics_server = axum::serve(metrics_listener, server::metrics::router(registry))
        .with_graceful_shutdown(shutdown.subscribe().wait());

    let handles = vec![
        tokio::spawn(api_server.into_future()),
        tokio::spawn(metrics_server.into_future()),
    ];

    shutdown::shutdown_signal().await?;
    info!("shutdown signal received");
    shutdown.begin();
    shutdown::drain(handles, config.server.shutdown_grace()).await;

    store.close().await;
    info!("munind stopped");
    Ok(())
}
