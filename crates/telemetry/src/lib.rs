//! Logging and tracing bootstrap.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unfail_kernel::settings::{LogFormat, TelemetrySettings};

const DEFAULT_FILTER: &str = "info";

/// Build the filter from `RUST_LOG`, falling back to `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays machine-readable.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place and return an error that callers may ignore.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter());

    match settings.log_format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    tracing::debug!(
        target: "unfail-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}
