//! # Decryption Fan-Out
//!
//! Handle over the decryption tasks a pass spawned. Dropping it detaches the
//! tasks; they keep running and still write their results.

use tokio::task::JoinHandle;
use tracing::warn;

/// Background decryption tasks of one reconciliation pass.
#[derive(Debug, Default)]
pub struct FanOut {
    generation: u64,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl FanOut {
    /// Nothing dispatched (pass did not publish, or no card has an id).
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            tasks: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, doc_id: String, task: JoinHandle<()>) {
        self.tasks.push((doc_id, task));
    }

    /// Pass that dispatched these tasks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cards a task was dispatched for.
    pub fn doc_ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|(doc_id, _)| doc_id.as_str()).collect()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task was dispatched.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task. A panicked task is logged and skipped.
    pub async fn wait(self) {
        for (doc_id, task) in self.tasks {
            if let Err(e) = task.await {
                warn!("[pr-04] Decryption task for {} aborted: {}", doc_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_joins_all_tasks() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut fan_out = FanOut::empty(3);
        for doc_id in ["a", "b"] {
            let counter = counter.clone();
            fan_out.push(
                doc_id.to_string(),
                tokio::spawn(async move {
                    counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                }),
            );
        }
        assert_eq!(fan_out.generation(), 3);
        assert_eq!(fan_out.doc_ids(), vec!["a", "b"]);
        fan_out.wait().await;
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicked_task_does_not_stop_wait() {
        let mut fan_out = FanOut::empty(1);
        fan_out.push("boom".to_string(), tokio::spawn(async { panic!("boom") }));
        fan_out.push("ok".to_string(), tokio::spawn(async {}));
        fan_out.wait().await;
    }
}
