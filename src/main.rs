use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::Context;
use clap::{Parser, Subcommand};

use fee_heartbeat::config::loader::AppConfig;
use fee_heartbeat::context::AppContext;
use fee_heartbeat::observability::{metrics, tracing as logging};
use fee_heartbeat::sampling::pipeline::RunOutcome;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "fee-heartbeat", about = "Samples BTC and ETH fee oracles on a fixed cadence")]
struct Cli {
    /// Path to a TOML config file (defaults to config/default.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Run the scheduler and the read API (default)
    Serve,
    /// Take and persist a single sample, then exit
    RunOnce,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(config.logging.format);
    metrics::register_metrics()?;

    // Fail fast: nothing runs without a live store.
    let ctx = AppContext::connect(config)
        .await
        .context("could not connect to the sample store")?;

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&ctx).await,
        Command::RunOnce => run_once(&ctx).await,
    };

    ctx.store.close().await;
    result
}

async fn serve(ctx: &AppContext) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", ctx.config.server.bind, ctx.config.server.port)
        .parse()
        .context("invalid bind address")?;
    // Bound before anything is scheduled, so a taken port starts no runs.
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    ctx.serve(listener, shutdown_signal(), SHUTDOWN_GRACE)
        .await
        .context("HTTP server failed")
}

async fn run_once(ctx: &AppContext) -> anyhow::Result<()> {
    match ctx.pipeline.run_once().await? {
        RunOutcome::Committed(sample) => {
            tracing::info!("Gas fees saved for hour {}", sample.hour_of_day());
        }
        RunOutcome::Skipped { failed } => {
            tracing::warn!("Nothing saved, failed sources: {:?}", failed);
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}
