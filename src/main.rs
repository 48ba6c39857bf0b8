//! Pairwatch - live USDT pair prices in the terminal.

use pairwatch::{App, Config, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_or_default()?;

    // The TUI owns stdout, so logs go to a file
    let _guard = init_logging()?;
    info!(base_url = %config.exchange.base_url, "Starting pairwatch");

    // Run the application
    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}

fn init_logging() -> Result<WorkerGuard> {
    let log_dir = pairwatch::config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "pairwatch.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pairwatch=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}
