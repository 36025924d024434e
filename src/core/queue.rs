use super::models::Task;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Fixed set of pending tasks shared by all workers.
///
/// Loaded once before any worker starts. `try_take` hands each task to at
/// most one caller; `join` resolves once every loaded task has been acked.
pub struct TaskSource {
    queue: ArrayQueue<Task>,
    total: usize,
    acked: AtomicUsize,
    drained: Notify,
}

impl TaskSource {
    pub fn load(tasks: Vec<Task>) -> Self {
        let total = tasks.len();
        // ArrayQueue rejects a zero capacity
        let queue = ArrayQueue::new(total.max(1));
        for task in tasks {
            // capacity == total, so this cannot overflow
            let _ = queue.push(task);
        }

        Self {
            queue,
            total,
            acked: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    pub fn try_take(&self) -> Option<Task> {
        self.queue.pop()
    }

    /// Marks one taken task as finished.
    pub fn ack(&self) {
        let done = self.acked.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(done <= self.total, "acked more tasks than were loaded");
        if done >= self.total {
            self.drained.notify_waiters();
        }
    }

    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // register before checking so a concurrent final ack is not missed
            notified.as_mut().enable();

            if self.is_drained() {
                return;
            }
            notified.await;
        }
    }

    pub fn is_drained(&self) -> bool {
        self.acknowledged() >= self.total
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn acknowledged(&self) -> usize {
        self.acked.load(Ordering::Acquire)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn tasks(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| Task::new(format!("user{}", i), "pw", format!("10.0.0.{}", i)))
            .collect()
    }

    #[test]
    fn test_empty_source_is_drained() {
        let source = TaskSource::load(Vec::new());
        assert_eq!(source.total(), 0);
        assert!(source.try_take().is_none());
        assert!(source.is_drained());
    }

    #[test]
    fn test_take_is_fifo_and_exhausts() {
        let source = TaskSource::load(tasks(3));
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.try_take().unwrap().principal, "user0");
        assert_eq!(source.try_take().unwrap().principal, "user1");
        assert_eq!(source.try_take().unwrap().principal, "user2");
        assert!(source.try_take().is_none());
        assert!(!source.is_drained());
    }

    #[test]
    fn test_concurrent_takers_receive_each_task_once() {
        const TOTAL: usize = 2_000;
        let source = Arc::new(TaskSource::load(tasks(TOTAL)));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                let seen = Arc::clone(&seen);
                std::thread::spawn(move || {
                    while let Some(task) = source.try_take() {
                        seen.lock().unwrap().push(task.principal);
                        source.ack();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let seen = seen.lock().unwrap();
        let unique: HashSet<_> = seen.iter().collect();
        assert_eq!(seen.len(), TOTAL);
        assert_eq!(unique.len(), TOTAL);
        assert_eq!(source.acknowledged(), TOTAL);
        assert!(source.is_drained());
    }

    #[tokio::test]
    async fn test_join_returns_immediately_when_empty() {
        let source = TaskSource::load(Vec::new());
        tokio::time::timeout(Duration::from_secs(1), source.join())
            .await
            .expect("join should not wait on an empty source");
    }

    #[tokio::test]
    async fn test_join_waits_for_every_ack() {
        let source = Arc::new(TaskSource::load(tasks(2)));
        let first = source.try_take().unwrap();
        let second = source.try_take().unwrap();
        source.ack();

        let waiter = {
            let source = Arc::clone(&source);
            tokio::spawn(async move { source.join().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        source.ack();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("join should resolve after the last ack")
            .unwrap();
        drop((first, second));
    }
}
