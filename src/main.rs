use memdocdb::{Config, Invocation, Registry};

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present; reported once logging is up
    let dotenv_result = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _guard = init_logging(config.log_dir.as_deref());

    if let Err(e) = dotenv_result {
        warn!("No .env file found or error loading it: {}", e);
    }

    info!("Default database: {:?}", config.default_database);
    info!("Preload databases: {:?}", config.preload_databases);

    let registry: Arc<Registry> = Registry::with_config(&config)?;

    // Each argument is resolved the way `registry.<name>()` would be
    for symbol in std::env::args().skip(1) {
        match registry.invoke(&symbol, &[])? {
            Invocation::Database(db) => info!("Resolved database: {}", db.name()),
            other => debug!("{} -> {:?}", symbol, other),
        }
    }

    println!("{}", serde_json::to_string_pretty(&registry.summary())?);

    Ok(())
}

/// Console logging always; JSON file logging with daily rotation when a log
/// directory is configured. The returned guard must outlive logging.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Warning: Could not create log directory {}: {}", dir.display(), e);
            }
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "memdocdb.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,memdocdb=debug")),
        )
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    debug!("Logging initialized - log directory: {:?}", log_dir);

    guard
}
