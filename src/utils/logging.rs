use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn level_from_cli(cli: &crate::cli::args::Cli) -> tracing::Level {
    if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    }
}

/// Logs go to stderr: stdout may be carrying result records.
pub fn init(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("ssh_checker={}", level).parse()?)
        .add_directive(level.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Sends panic reports to the debug log instead of stderr. A panic inside a
/// check is already reported as that task's error line.
pub fn route_panics() {
    std::panic::set_hook(Box::new(|info| {
        tracing::debug!("Panic: {}", info);
    }));
}
