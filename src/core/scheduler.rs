use super::collector::{CollectorSummary, ResultCollector};
use super::errors::{CheckerError, Result};
use super::events::{self, Event, EventSender, publish};
use super::models::{Outcome, Task};
use super::queue::TaskSource;
use crate::executors::CheckExecutor;
use crate::ui::progress::ProgressDisplay;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub timeout: Duration,
    pub report_failures: bool,
}

/// Never more workers than tasks.
pub fn pool_size(requested: usize, total: usize) -> usize {
    requested.min(total)
}

/// Runs one check under a hard deadline, turning every way it can go wrong
/// into an `Outcome` instead of a propagated error or panic.
pub async fn check(executor: &dyn CheckExecutor, task: &Task, limit: Duration) -> Outcome {
    let attempt = AssertUnwindSafe(executor.execute(task, limit)).catch_unwind();

    match tokio::time::timeout(limit, attempt).await {
        Ok(Ok(Ok(status))) => Outcome::from_status(status),
        Ok(Ok(Err(e))) => {
            tracing::debug!("Probe for {} could not run: {}", task, e);
            Outcome::ExecutionError(e.to_string())
        }
        Ok(Err(panic)) => {
            Outcome::ExecutionError(format!("probe panicked: {}", panic_message(panic.as_ref())))
        }
        Err(_) => {
            tracing::debug!("Probe for {} timed out after {:?}", task, limit);
            Outcome::Unreachable
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn outcome_event(task: Task, outcome: Outcome, report_failures: bool) -> Option<Event> {
    match outcome {
        Outcome::Success => Some(Event::Success { task }),
        Outcome::ExecutionError(message) => Some(Event::Error { task, message }),
        other if report_failures => Some(Event::Failure { task, outcome: other }),
        _ => None,
    }
}

async fn worker_loop(
    id: usize,
    source: Arc<TaskSource>,
    sink: EventSender,
    executor: Arc<dyn CheckExecutor>,
    settings: WorkerSettings,
) -> usize {
    tracing::debug!("Worker {} started", id);
    let mut handled = 0;

    loop {
        // collector gone: nothing can be recorded, so stop probing
        if sink.is_closed() {
            let skipped = discard_remaining(&source);
            if skipped > 0 {
                tracing::warn!(
                    "Worker {} stopped, result sink closed; skipped {} tasks",
                    id,
                    skipped
                );
            }
            break;
        }
        let Some(task) = source.try_take() else {
            break;
        };
        let outcome = check(executor.as_ref(), &task, settings.timeout).await;
        publish(&sink, outcome_event(task, outcome, settings.report_failures));
        source.ack();
        handled += 1;
    }

    tracing::debug!("Worker {} finished after {} tasks", id, handled);
    handled
}

/// Takes and acks every task left without running it, so `TaskSource::join`
/// still resolves.
fn discard_remaining(source: &TaskSource) -> usize {
    let mut skipped = 0;
    while source.try_take().is_some() {
        source.ack();
        skipped += 1;
    }
    skipped
}

/// Fixed set of workers draining a shared `TaskSource`.
pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    pub fn spawn(
        n: usize,
        source: &Arc<TaskSource>,
        sink: &EventSender,
        executor: &Arc<dyn CheckExecutor>,
        settings: WorkerSettings,
    ) -> Self {
        let handles = (0..n)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(source),
                    sink.clone(),
                    Arc::clone(executor),
                    settings,
                ))
            })
            .collect();
        Self { handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker and returns how many tasks each handled.
    pub async fn join(self) -> Result<Vec<usize>> {
        let mut handled = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let count = handle
                .await
                .map_err(|e| CheckerError::Internal(format!("worker died: {}", e)))?;
            handled.push(count);
        }
        Ok(handled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub workers: usize,
    pub handled_per_worker: Vec<usize>,
    pub collected: CollectorSummary,
    pub elapsed: Duration,
}

/// Loads the tasks, runs the pool against them and shuts down in order:
/// every task acked and every worker finished, then the sink closed, then
/// the collector drained.
pub async fn run_pipeline(
    tasks: Vec<Task>,
    executor: Arc<dyn CheckExecutor>,
    collector: ResultCollector,
    parallelism: usize,
    settings: WorkerSettings,
) -> Result<(RunSummary, ProgressDisplay)> {
    let started = Instant::now();
    let total = tasks.len();
    let workers = pool_size(parallelism, total);
    tracing::info!("Checking {} credentials with {} workers", total, workers);

    let source = Arc::new(TaskSource::load(tasks));
    let (sink, receiver) = events::channel();

    let collector = tokio::spawn(collector.run(receiver));
    let pool = WorkerPool::spawn(workers, &source, &sink, &executor, settings);
    // workers hold their own clones; ours only keeps the sink open
    drop(sink);

    let (_, handled_per_worker) = tokio::try_join!(
        async {
            source.join().await;
            Ok::<_, CheckerError>(())
        },
        pool.join(),
    )?;
    tracing::debug!("All {} tasks acknowledged, closing result sink", source.acknowledged());

    let (collected, display) = collector
        .await
        .map_err(|e| CheckerError::Internal(format!("result collector died: {}", e)))??;

    Ok((
        RunSummary {
            total,
            workers,
            handled_per_worker,
            collected,
            elapsed: started.elapsed(),
        },
        display,
    ))
}
