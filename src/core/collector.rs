use super::errors::{CheckerError, Result};
use super::events::{Event, EventReceiver};
use crate::reporters::writer::ResultWriter;
use crate::ui::printer::Role;
use crate::ui::progress::ProgressDisplay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorSummary {
    pub completed: usize,
    pub successes: usize,
    pub errors: usize,
    pub failures: usize,
}

/// The single consumer of the result sink. Owns the output writer and the
/// progress counter outright; nothing else touches either.
pub struct ResultCollector {
    writer: ResultWriter,
    display: ProgressDisplay,
    summary: CollectorSummary,
}

impl ResultCollector {
    pub fn new(writer: ResultWriter, display: ProgressDisplay) -> Self {
        Self {
            writer,
            display,
            summary: CollectorSummary::default(),
        }
    }

    /// Drains events until every sender is gone and the buffer is empty.
    pub async fn run(
        mut self,
        mut events: EventReceiver,
    ) -> Result<(CollectorSummary, ProgressDisplay)> {
        while let Some(event) = events.recv().await {
            self.handle(event)?;
        }
        tracing::debug!("Result sink closed after {} progress ticks", self.summary.completed);
        Ok((self.summary, self.display))
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Success { task } => {
                self.writer.record(&task)?;
                self.summary.successes += 1;
                tracing::info!("Credential accepted: {}", task);
            }
            Event::Error { task, message } => {
                self.summary.errors += 1;
                self.display
                    .line(&format!("[error] {}: {}", task, message), Role::Error)
                    .map_err(CheckerError::Write)?;
            }
            Event::Failure { task, outcome } => {
                self.summary.failures += 1;
                self.display
                    .line(&format!("[{}] {}", outcome.label(), task), Role::Warning)
                    .map_err(CheckerError::Write)?;
            }
            Event::Progress => {
                self.summary.completed += 1;
                self.display
                    .tick(self.summary.completed)
                    .map_err(CheckerError::Write)?;
            }
        }
        Ok(())
    }
}
