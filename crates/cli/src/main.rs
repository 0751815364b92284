//! TransVox server entry point.
//!
//! Loads configuration, wires the scheduler, and serves the HTTP API
//! until interrupted. Ctrl-C triggers a graceful shutdown that stops the
//! scheduling loop and tears down any live stage process trees.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vox_core::config::load_config_or_default;
use vox_core::scheduler::JobScheduler;
use vox_core::stages::StageRegistry;
use vox_core::store::JobStore;
use vox_core::supervisor::ProcessSupervisor;

#[derive(Parser, Debug)]
#[command(name = "transvox", version, about = "Media dubbing pipeline orchestrator")]
struct Cli {
    /// Path to the orchestrator configuration file.
    #[arg(long, default_value = "transvox.toml")]
    config: PathBuf,

    /// Address the HTTP API binds to.
    #[arg(long, default_value = "127.0.0.1:8000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_or_default(&cli.config)?;
    tracing::info!(
        config = %cli.config.display(),
        concurrency = config.max_global_concurrency,
        workspace = %config.workspace_root.display(),
        "starting transvox"
    );

    let registry = Arc::new(StageRegistry::standard(&config.tools));
    let scheduler = Arc::new(JobScheduler::new(
        config,
        Arc::new(JobStore::new()),
        Arc::new(ProcessSupervisor::new()),
        registry,
    ));
    let loop_handle = scheduler.clone().spawn_loop();

    let app = vox_api::router(scheduler.clone());
    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!(listen = %cli.listen, "api listening");

    let on_shutdown = scheduler.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!(%error, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
            on_shutdown.shutdown();
        })
        .await?;

    loop_handle.await?;
    Ok(())
}
