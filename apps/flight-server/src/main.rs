mod config;
mod http;
mod logging;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flights::FlightsModule;
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::net::TcpListener;

use crate::config::{AppConfig, CliOverrides, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Flight Server - flight records over a hypermedia REST API
#[derive(Parser)]
#[command(name = "flight-server")]
#[command(about = "Flight Server - flight records over a hypermedia REST API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database (sqlite::memory:)
    #[arg(long)]
    mock: bool,

    /// Insert demo flights when the table is empty
    #[arg(long)]
    seed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (FLIGHTS__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
        seed: cli.seed,
    });

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn connect_db(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.max_connections(cfg.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    if cfg.dsn.contains(":memory:") {
        // Each pooled connection would otherwise get its own empty database.
        opts.max_connections(1).min_connections(1);
    }

    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to database '{}'", redact_dsn(&cfg.dsn)))
}

/// Drop credentials from a DSN before logging it.
fn redact_dsn(dsn: &str) -> String {
    match (dsn.split_once("://"), dsn.rfind('@')) {
        (Some((scheme, _)), Some(at)) => format!("{scheme}://***{}", &dsn[at..]),
        _ => dsn.to_owned(),
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;
    tracing::info!("Flight Server starting");

    let db = connect_db(&config.database).await?;
    let module = FlightsModule::init(db, &config.flights).await?;
    let app = http::build_router(&config.server, &module);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        base_path = %config.server.base_path,
        "Flight Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "Signal handling failed, shutting down");
            }
        })
        .await
        .context("server error")?;

    tracing::info!("Flight Server stopped");
    Ok(())
}
