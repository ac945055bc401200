//! GazeAid Server

use std::net::SocketAddr;
use std::str::FromStr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gazeaid_server::{http, AppState, Cli, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = Level::from_str(&cli.log_level)
        .map_err(|e| format!("Invalid log level '{}': {}", cli.log_level, e))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load config
    let config = Config::from_cli(&cli);
    config.validate()?;
    let addr: SocketAddr = config.bind_addr.parse()?;

    info!(templates = %config.templates_dir().display(), "Checking template and static directories");
    config.ensure_directories()?;

    let state = AppState::new(config)?;
    info!(
        base_dir = %state.config.base_dir.display(),
        interpreter = %state.config.interpreter.display(),
        tasks = ?state.supervisor.tasks().names().collect::<Vec<_>>(),
        detection_policy = ?state.config.detection_policy,
        "Starting GazeAid server"
    );

    let router = http::create_router(state)?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
