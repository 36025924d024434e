use crate::{
    cli::args::Cli,
    config::{ConfigLoader, RunConfig},
    core::{
        collector::ResultCollector,
        models::Task,
        scheduler::{self, RunSummary, WorkerSettings},
    },
    executors::{CheckExecutor, SshProbe, toolchain},
    parser,
    reporters::writer::ResultWriter,
    ui::{
        printer::{self, Diagnostics},
        progress::{ProgressDisplay, ProgressMode},
    },
    utils::logging,
};
use anyhow::{Context, Result};
use std::sync::Arc;

pub async fn run(cli: Cli) -> Result<RunSummary> {
    let level = logging::level_from_cli(&cli);
    logging::init(level)?;

    let file = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = ConfigLoader::resolve(&cli, file)?;
    tracing::info!(
        "Timeout {:?}, parallelism {}, output {}",
        config.timeout,
        config.parallelism,
        config.output
    );

    // everything is read and opened up front; nothing below is a startup failure
    let tasks = parser::read_tasks(&config.input)
        .with_context(|| format!("Failed to load credentials from {}", config.input))?;
    let writer = ResultWriter::open(&config.output, config.output_format)?;

    if !tasks.is_empty() {
        toolchain::missing_tools(&config.probe);
    }

    let executor: Arc<dyn CheckExecutor> = Arc::new(SshProbe::new(config.probe.clone()));
    execute(tasks, executor, writer, Diagnostics::stderr(), &config).await
}

/// Runs already-loaded tasks to completion and prints the closing summary.
pub async fn execute(
    tasks: Vec<Task>,
    executor: Arc<dyn CheckExecutor>,
    writer: ResultWriter,
    diagnostics: Diagnostics,
    config: &RunConfig,
) -> Result<RunSummary> {
    let mode = ProgressMode::detect(&diagnostics, config.quiet);
    let display = ProgressDisplay::new(diagnostics, mode, tasks.len());
    let collector = ResultCollector::new(writer, display);

    let settings = WorkerSettings {
        timeout: config.timeout,
        report_failures: config.report_failures,
    };
    let (summary, mut display) =
        scheduler::run_pipeline(tasks, executor, collector, config.parallelism, settings).await?;

    let (line, role) = printer::summary_line(&summary);
    display.finish(&line, role)?;

    tracing::info!(
        "Run finished: {} workers handled {:?}",
        summary.workers,
        summary.handled_per_worker
    );
    Ok(summary)
}
