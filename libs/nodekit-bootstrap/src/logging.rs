use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Logs go to stderr so
/// stdout stays clean for `--print-config` and `check`. Calling this twice is
/// harmless: the second call keeps the first subscriber.
pub fn init_logging(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|e| {
            eprintln!("invalid log level '{}': {e}; falling back to info", cfg.level);
            EnvFilter::new("info")
        });

    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match cfg.format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(fmt),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(fmt.json()),
        ),
    };
    if result.is_err() {
        return;
    }

    // Route `log` records from dependencies into tracing
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!(error = %e, "log bridge already installed");
    }
}
