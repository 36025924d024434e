use super::models::{Outcome, Task};
use tokio::sync::mpsc;

/// Messages flowing from workers to the single result collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Success { task: Task },
    Error { task: Task, message: String },
    /// Only published when failure auditing is enabled.
    Failure { task: Task, outcome: Outcome },
    /// One task fully accounted for, whatever happened to it.
    Progress,
}

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Creates the result sink. It closes once every sender is dropped, and the
/// receiver still yields whatever was buffered before that.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Sends an outcome event followed by its progress tick.
///
/// Both go through the same sender back to back, so the collector never
/// sees this task's tick before its outcome.
pub fn publish(sender: &EventSender, outcome: Option<Event>) {
    if let Some(event) = outcome {
        if sender.send(event).is_err() {
            tracing::warn!("Result collector is gone, dropping event");
        }
    }
    if sender.send(Event::Progress).is_err() {
        tracing::warn!("Result collector is gone, dropping progress tick");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outcome_precedes_progress() {
        let (tx, mut rx) = channel();
        let task = Task::new("a", "p1", "h1");

        publish(&tx, Some(Event::Success { task: task.clone() }));
        publish(&tx, None);
        drop(tx);

        assert_eq!(rx.recv().await, Some(Event::Success { task }));
        assert_eq!(rx.recv().await, Some(Event::Progress));
        assert_eq!(rx.recv().await, Some(Event::Progress));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_buffered_events_survive_close() {
        let (tx, mut rx) = channel();
        for _ in 0..100 {
            publish(&tx, None);
        }
        drop(tx);

        let mut ticks = 0;
        while let Some(event) = rx.recv().await {
            assert_eq!(event, Event::Progress);
            ticks += 1;
        }
        assert_eq!(ticks, 100);
    }

    #[test]
    fn test_publish_after_close_does_not_panic() {
        let (tx, rx) = channel();
        drop(rx);
        publish(&tx, Some(Event::Progress));
    }
}
