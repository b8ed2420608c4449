use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tns_mirror_http::{create_router, start_refresh_scheduler, AppState};
use tns_mirror_ingest::{FeedClient, FeedConfig, RefreshPipeline};
use tns_mirror_storage::PgCatalog;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tns-mirror")]
#[command(about = "Mirror of the Transient Name Server catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Refresh the catalog every N seconds; off when not given.
        #[arg(long)]
        refresh_interval_secs: Option<u64>,
    },
    /// Run one catalog refresh and exit.
    Refresh,
    /// Block until the database answers a trivial query.
    WaitDb,
}

fn database_url() -> Result<String> {
    std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable must be set"))
}

fn build_pipeline(catalog: PgCatalog) -> Result<RefreshPipeline> {
    let config = FeedConfig::from_env()?;
    Ok(RefreshPipeline::new(FeedClient::new(config)?, catalog))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, refresh_interval_secs } => {
            let catalog = PgCatalog::new(&database_url()?).await?;
            // Query-only deployments run without TNS credentials; the
            // refresh endpoint then answers 503.
            let pipeline = match build_pipeline(catalog.clone()) {
                Ok(p) => Some(Arc::new(p)),
                Err(e) => {
                    tracing::warn!("refresh disabled: {e}");
                    None
                },
            };
            if let (Some(pipeline), Some(interval)) = (&pipeline, refresh_interval_secs) {
                start_refresh_scheduler(Arc::clone(pipeline), interval);
            }
            let state = Arc::new(AppState { catalog, pipeline });
            let router = create_router(state);
            let addr = format!("{host}:{port}");
            tracing::info!("starting HTTP server on {addr}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        },
        Commands::Refresh => {
            let catalog = PgCatalog::new(&database_url()?).await?;
            let pipeline = build_pipeline(catalog)?;
            let result = pipeline.refresh().await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        },
        Commands::WaitDb => {
            let url = database_url()?;
            loop {
                if let Ok(catalog) = PgCatalog::new(&url).await {
                    if catalog.ping().await.is_ok() {
                        break;
                    }
                }
                tracing::info!("waiting for postgres to be available");
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }
            tracing::info!("postgres is available");
        },
    }

    Ok(())
}
