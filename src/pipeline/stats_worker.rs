//! Asynchronous click-statistics pipeline.
//!
//! Redirect handlers publish [`ClickEvent`]s through a bounded channel and
//! never wait on storage. A single consumer batches events and flushes them
//! when the batch fills or the flush interval elapses, whichever comes
//! first. When the channel is full the event is dropped and counted; losing
//! a click is preferable to slowing a redirect.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{AccessLogRepository, LinkRepository};

/// Producer handle for the stats pipeline.
///
/// Cheap to clone; every clone publishes into the same bounded channel.
#[derive(Clone)]
pub struct StatsHandle {
    tx: mpsc::Sender<ClickEvent>,
}

impl StatsHandle {
    pub fn new(tx: mpsc::Sender<ClickEvent>) -> Self {
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

    /// Publishes a click event without blocking.
    ///
    /// Returns `false` when the queue is full and the event was dropped.
    pub fn publish(&self, event: ClickEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => {
                metrics::counter!("stats_events_published_total").increment(1);
                true
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!("stats_events_dropped_total").increment(1);
                warn!("Stats queue full, dropping click for link_id={}", event.link_id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                metrics::counter!("stats_events_dropped_total").increment(1);
                warn!(
                    "Stats pipeline stopped, dropping click for link_id={}",
                    event.link_id
                );
                false
            }
        }
    }
}

/// Spawns the stats consumer task.
///
/// The task runs until every [`StatsHandle`] is dropped, then flushes
/// whatever is buffered and exits. Await the returned handle during
/// shutdown to guarantee the final flush completed.
pub fn spawn_stats_worker(
    link_repository: Arc<dyn LinkRepository>,
    access_log_repository: Arc<dyn AccessLogRepository>,
    rx: mpsc::Receiver<ClickEvent>,
    batch_size: usize,
    flush_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run(
        link_repository,
        access_log_repository,
        rx,
        batch_size,
        flush_interval,
    ))
}

async fn run(
    link_repository: Arc<dyn LinkRepository>,
    access_log_repository: Arc<dyn AccessLogRepository>,
    mut rx: mpsc::Receiver<ClickEvent>,
    batch_size: usize,
    flush_interval: Duration,
) {
    info!(
        "Stats worker started (batch_size={}, flush_interval={:?})",
        batch_size, flush_interval
    );

    let mut batch: Vec<ClickEvent> = Vec::with_capacity(batch_size);
    let mut ticker = tokio::time::interval(flush_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; swallow it so an empty startup
    // batch is not flushed.
    ticker.tick().await;

    loop {
        tokio::select! {
            received = rx.recv() => {
                match received {
                    Some(event) => {
                        batch.push(event);
                        if batch.len() >= batch_size {
                            flush(&link_repository, &access_log_repository, &mut batch).await;
                            ticker.reset();
                        }
                    }
                    None => {
                        // Channel closed: drain already happened inside
                        // recv(), only the current batch remains.
                        flush(&link_repository, &access_log_repository, &mut batch).await;
                        info!("Stats worker stopped");
                        return;
                    }
                }
            }
            _ = ticker.tick() => {
                flush(&link_repository, &access_log_repository, &mut batch).await;
            }
        }
    }
}

async fn flush(
    link_repository: &Arc<dyn LinkRepository>,
    access_log_repository: &Arc<dyn AccessLogRepository>,
    batch: &mut Vec<ClickEvent>,
) {
    if batch.is_empty() {
        return;
    }

    let events = std::mem::take(batch);
    debug!("Flushing {} click events", events.len());

    let mut counts: HashMap<i64, i64> = HashMap::new();
    for event in &events {
        *counts.entry(event.link_id).or_insert(0) += 1;
    }

    for (link_id, count) in counts {
        if let Err(e) = link_repository.increment_clicks(link_id, count).await {
            metrics::counter!("stats_flush_errors_total").increment(1);
            error!("Failed to increment clicks for link_id={}: {}", link_id, e);
        }
    }

    let flushed = events.len() as u64;
    for event in events {
        if let Err(e) = access_log_repository.create(event.into_click()).await {
            metrics::counter!("stats_flush_errors_total").increment(1);
            error!("Failed to record click audit row: {}", e);
        }
    }

    metrics::counter!("stats_events_flushed_total").increment(flushed);
}
