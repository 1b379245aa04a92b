use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Diagnostic channel: newline-delimited JSON records on stderr. Stdout is
/// reserved for the one-line port announcement, so nothing else may ever be
/// written there.
pub fn setup_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log level {log_level:?}"))?;

    let stderr_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry().with(filter).with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!(
        plugin_name = crate::constants::PLUGIN_NAME,
        plugin_version = crate::constants::PLUGIN_VERSION,
        "logging initialized"
    );

    Ok(())
}
