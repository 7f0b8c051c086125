//! Subscriber initialisation

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `level`. Journald output is added when
/// the journal socket is reachable.
pub fn init_logging(level: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let journal_layer = tracing_journald::layer().ok();
    let has_journal = journal_layer.is_some();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(journal_layer);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }

    if has_journal {
        info!("Logging initialized with systemd journald");
    } else {
        info!("Logging initialized with console output");
    }

    Ok(())
}
