pub mod api;
pub mod cli;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use clap::Parser;
use std::sync::Arc;

use cli::{BatchArgs, Cli, Command};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_inventory_lookup::InventoryLookup;
use shared::clock::SystemClock;
use shared::config::Config;
use shared::marketplaces::coupang::{CoupangApiClient, Credentials};
use usecases::u501_inventory_lookup::{LookupExecutor, LookupSettings, ProgressTracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, source) = shared::config::load_config()?;
    system::tracing::initialize(&config.logging)?;
    source.log();

    tracing::info!(
        "UseCase {} ({}) ready: {}",
        InventoryLookup::full_name(),
        InventoryLookup::display_name(),
        InventoryLookup::description()
    );
    tracing::info!(
        "Gateway: {} (timeout {}s, delay {}ms)",
        config.gateway.base_url,
        config.gateway.timeout_secs,
        config.gateway.request_delay_ms
    );

    let executor = build_executor(&config)?;

    match cli.command {
        None | Some(Command::Serve) => serve(&config, executor).await,
        Some(Command::Batch(args)) => batch(&executor, args).await,
    }
}

fn build_executor(config: &Config) -> anyhow::Result<LookupExecutor> {
    let gateway = Arc::new(CoupangApiClient::new(&config.gateway)?);
    Ok(LookupExecutor::new(
        gateway,
        Arc::new(SystemClock),
        LookupSettings::from_config(config)?,
        Arc::new(ProgressTracker::new()),
    ))
}

async fn batch(executor: &LookupExecutor, args: BatchArgs) -> anyhow::Result<()> {
    let credentials = Credentials::new(args.access_key, args.secret_key);
    usecases::u501_inventory_lookup::run_file_batch(
        executor,
        &credentials,
        &args.input,
        &args.output,
    )
    .await?;
    Ok(())
}

async fn serve(config: &Config, executor: LookupExecutor) -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    let state = api::state::AppState {
        executor: Arc::new(executor),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(state)
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server.host '{}': {}", config.server.host, e))?;
    let addr = SocketAddr::new(host, config.server.port);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
