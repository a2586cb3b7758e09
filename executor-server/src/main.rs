//! Action executor server - runs development actions on request.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use executor::core::action::ActionKind;
use executor::dispatch::Dispatcher;
use executor::io::config::{CONFIG_FILE_NAME, load_config};
use tracing::{info, warn};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "executor-server")]
#[command(version, about = "HTTP service that creates branches and runs tests on request")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "5000")]
    port: u16,

    /// Working directory for every subprocess (the target repository)
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Executor config file (defaults to <project-dir>/.executor.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    executor::logging::init();

    let args = Args::parse();

    let project_dir = args.project_dir.canonicalize().unwrap_or(args.project_dir);
    let config_path = args
        .config
        .unwrap_or_else(|| project_dir.join(CONFIG_FILE_NAME));
    let config = load_config(&config_path)?;
    if config.command_timeout().is_none() {
        warn!("no command timeout configured; a hung subprocess blocks its request");
    }

    info!(agent = %executor::agent_label(), "starting");
    info!(project_dir = %project_dir.display(), config = %config_path.display(), "configuration loaded");

    let state = AppState::new(Dispatcher::new(project_dir, &config));
    let app = routes::app(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!(addr = %addr, "listening");
    for (path, description) in routes::ENDPOINTS {
        info!(path, description, "endpoint");
    }
    for kind in ActionKind::ALL {
        info!(action = %kind, description = kind.description(), "action available");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
