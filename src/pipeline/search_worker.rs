//! Asynchronous search-index pipeline.
//!
//! Link mutations publish [`SearchTask`]s through a bounded channel; a
//! single consumer applies them to the search backend with bounded retry.
//! The index is best-effort: a task that exhausts its retries is logged
//! and discarded, and the worker moves on to the next one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::search_task::SearchTask;
use crate::infrastructure::search::SearchIndexClient;

/// Producer handle for the search pipeline.
#[derive(Clone)]
pub struct SearchHandle {
    tx: mpsc::Sender<SearchTask>,
}

impl SearchHandle {
    pub fn new(tx: mpsc::Sender<SearchTask>) -> Self {
        Self { tx }
    }

    /// True when the consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Remaining queue capacity.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }

    /// Publishes an index mutation without blocking.
    ///
    /// Returns `false` when the queue is full and the task was dropped.
    pub fn publish(&self, task: SearchTask) -> bool {
        match self.tx.try_send(task) {
            Ok(()) => {
                metrics::counter!("search_tasks_published_total").increment(1);
                true
            }
            Err(mpsc::error::TrySendError::Full(task)) => {
                metrics::counter!("search_tasks_dropped_total").increment(1);
                warn!(
                    "Search queue full, dropping {} for link_id={}",
                    task.action(),
                    task.link_id()
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(task)) => {
                metrics::counter!("search_tasks_dropped_total").increment(1);
                warn!(
                    "Search pipeline stopped, dropping {} for link_id={}",
                    task.action(),
                    task.link_id()
                );
                false
            }
        }
    }
}

/// Spawns the search consumer task.
///
/// Runs until every [`SearchHandle`] is dropped, then processes whatever
/// remains buffered and exits.
pub fn spawn_search_worker(
    client: Arc<dyn SearchIndexClient>,
    rx: mpsc::Receiver<SearchTask>,
    max_retries: u32,
    retry_base_delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run(client, rx, max_retries, retry_base_delay))
}

async fn run(
    client: Arc<dyn SearchIndexClient>,
    mut rx: mpsc::Receiver<SearchTask>,
    max_retries: u32,
    retry_base_delay: Duration,
) {
    info!("Search worker started (max_retries={})", max_retries);

    while let Some(task) = rx.recv().await {
        process(&client, task, max_retries, retry_base_delay).await;
    }

    info!("Search worker stopped");
}

async fn process(
    client: &Arc<dyn SearchIndexClient>,
    task: SearchTask,
    max_retries: u32,
    retry_base_delay: Duration,
) {
    let action = task.action();
    let link_id = task.link_id();

    for attempt in 1..=max_retries {
        let result = match &task {
            SearchTask::Index(doc) => client.upsert(doc.clone()).await,
            SearchTask::Delete(id) => client.delete(*id).await,
        };

        match result {
            Ok(()) => {
                metrics::counter!("search_tasks_applied_total").increment(1);
                debug!("Applied search {} for link_id={}", action, link_id);
                return;
            }
            Err(e) if attempt < max_retries => {
                // Linear backoff: attempt number scales the base delay.
                let delay = retry_base_delay * attempt;
                warn!(
                    "Search {} for link_id={} failed (attempt {}/{}): {}, retrying in {:?}",
                    action, link_id, attempt, max_retries, e, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                metrics::counter!("search_tasks_failed_total").increment(1);
                error!(
                    "Search {} for link_id={} failed after {} attempts: {}",
                    action, link_id, max_retries, e
                );
            }
        }
    }
}
