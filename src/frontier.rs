use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::items::WorkItem;
use crate::records::OutputRecord;

/// Default number of render attempts before an item is declared failed
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Per-URL retry accounting
#[derive(Debug, Default)]
struct RetryState {
    attempts: u32,
    errors: Vec<String>,
}

/// The shared work queue: pending items, URL deduplication, and bounded
/// retry accounting
///
/// Workers share one `Frontier` by cloning it; all synchronization lives
/// here. Items are deduplicated by URL at enqueue time, so re-adding a URL
/// is a no-op. The offers pagination loop always enqueues a fresh cursor
/// URL and is therefore never deduplicated against itself. Retries go back
/// on the queue directly, past the dedup check.
#[derive(Clone)]
pub struct Frontier {
    tx: mpsc::Sender<WorkItem>,
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    seen: Arc<Mutex<HashSet<String>>>,
    retries: Arc<Mutex<HashMap<String, RetryState>>>,
    max_attempts: u32,
}

impl Frontier {
    /// Create an empty frontier with the given retry budget
    pub fn new(max_attempts: u32) -> Self {
        let (tx, rx) = mpsc::channel::<WorkItem>(10000);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            seen: Arc::new(Mutex::new(HashSet::new())),
            retries: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
        }
    }

    /// Add an item unless its URL has been enqueued before
    ///
    /// Returns whether the item was actually added.
    pub async fn enqueue(&self, item: WorkItem) -> bool {
        {
            let mut seen = self.seen.lock().await;
            if !seen.insert(item.url().to_string()) {
                ::log::debug!("Skipping already queued URL: {}", item.url());
                return false;
            }
        }

        ::log::debug!("Queuing {} item: {}", item.stage_name(), item.url());
        self.tx.send(item).await.is_ok()
    }

    /// Receive the next pending item, or `None` once the queue stays empty
    ///
    /// Uses a bounded wait so idle workers drain when the crawl winds down.
    /// Worker 0 keeps the longest timeout; higher-numbered workers give up
    /// progressively sooner to avoid a long serial shutdown.
    pub async fn next(&self, worker_id: usize) -> Option<WorkItem> {
        let mut rx = self.rx.lock().await;

        let base_timeout: u64 = 5;
        let timeout_secs = base_timeout.saturating_sub(worker_id.min(4) as u64).max(1);
        let timeout_duration = tokio::time::Duration::from_secs(timeout_secs);

        match tokio::time::timeout(timeout_duration, rx.recv()).await {
            Ok(item) => item,
            Err(_) => {
                ::log::debug!(
                    "Worker {} timed out waiting for new items, assuming queue is drained",
                    worker_id
                );
                None
            }
        }
    }

    /// Account a transient failure for an item
    ///
    /// Below the retry budget the item goes back on the queue and `None` is
    /// returned. Once the budget is exhausted, the accumulated failure
    /// record is returned and the URL never re-enters the frontier.
    pub async fn record_failure(&self, item: WorkItem, error: String) -> Option<OutputRecord> {
        let url = item.url().to_string();

        let exhausted = {
            let mut retries = self.retries.lock().await;
            let state = retries.entry(url.clone()).or_default();
            state.attempts += 1;
            state.errors.push(error);
            state.attempts >= self.max_attempts
        };

        if !exhausted {
            ::log::warn!("Retrying {} after a transient failure", url);
            if self.tx.send(item).await.is_err() {
                ::log::error!("Frontier closed while re-queuing {}", url);
            }
            return None;
        }

        let mut retries = self.retries.lock().await;
        let state = retries.remove(&url).unwrap_or_default();
        ::log::error!("Giving up on {} after {} attempts", url, state.attempts);
        Some(OutputRecord::Failure {
            url,
            errors: state.errors,
        })
    }
}
