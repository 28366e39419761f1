use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rectify_cleanup::config::Policy;
use rectify_cleanup::error::ConfigError;
use rectify_cleanup::{daemon, sweep};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Upload root containing the per-session folders
    #[arg(long, env = "RECTIFY_UPLOAD_ROOT", default_value = "uploads")]
    root: String,

    /// Seconds between two sweeps
    #[arg(long, env = "RECTIFY_CLEANUP_INTERVAL", default_value_t = 1800)]
    interval: u64,

    /// Seconds a session may sit idle before it is removed
    #[arg(long, env = "RECTIFY_RETENTION_SECONDS", default_value_t = 3600)]
    retention: u64,

    /// Maximum total size of the upload root, in megabytes
    #[arg(long, env = "RECTIFY_MAX_STORAGE_MB", default_value_t = 500)]
    max_storage_mb: u64,

    /// Proactive eviction threshold, as a percent of the maximum
    #[arg(long, env = "RECTIFY_STORAGE_WARN_PERCENT", default_value_t = 80)]
    warn_percent: u64,

    /// Run a single sweep and exit (cron / Task Scheduler usage)
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let policy = Policy {
        interval: Duration::from_secs(args.interval),
        retention: Duration::from_secs(args.retention),
        max_storage_mb: args.max_storage_mb,
        warn_percent: args.warn_percent,
    };
    policy.validate()?;
    let root = PathBuf::from(&args.root);

    if args.once {
        // Scheduled-job mode: the server owns the root, do not create it.
        sweep::run_sweep(root, policy).await;
        return Ok(());
    }

    prepare_root(&root).await?;

    let cancel = CancellationToken::new();
    let worker = tokio::spawn(daemon::run(root, policy, cancel.clone()));

    shutdown_signal().await;
    info!("shutting down");
    cancel.cancel();
    worker.await?;
    Ok(())
}

/// In daemon mode the upload root is created if missing, the same way the
/// web server prepares it at startup.
async fn prepare_root(root: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::RootNotADirectory(root.display().to_string()).into()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tokio::fs::create_dir_all(root).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
