//! Daily task rotation daemon: owns the flat-file stores and serves
//! the JSON API.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use rota_core::policy::{DEFAULT_EXCLUSION_DAYS, DEFAULT_MAX_DAILY};
use rota_daemon::{config::DaemonConfig, http, service::TaskService};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rota-daemon", version, about = "Daily task rotation daemon")]
struct Args {
    /// Listen address, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Data directory (catalog under tasks/, state under state/).
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Maximum number of tasks drawn per day.
    #[arg(long, default_value_t = DEFAULT_MAX_DAILY)]
    max_daily: usize,

    /// Trailing exclusion window in days for recently completed tasks.
    #[arg(long, default_value_t = DEFAULT_EXCLUSION_DAYS)]
    exclusion_days: i64,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tasks_dir = args.data_dir.join("tasks");
    let state_dir = args.data_dir.join("state");
    tokio::fs::create_dir_all(&tasks_dir).await?;
    tokio::fs::create_dir_all(&state_dir).await?;

    let config = DaemonConfig {
        tasks_dir,
        history_path: state_dir.join("completed_tasks.json"),
        selection_path: state_dir.join("daily_selection.json"),
        max_daily: args.max_daily,
        exclusion_days: args.exclusion_days,
    };

    let svc = Arc::new(TaskService::new(&config));
    let app = http::router(svc);

    tracing::info!(listen = %args.listen, data_dir = %args.data_dir.display(), "daemon starting");
    axum::serve(tokio::net::TcpListener::bind(args.listen).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown requested");
}
