use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::CrawlConfig;
use crate::frontier::Frontier;
use crate::items::WorkItem;
use crate::records::OutputRecord;
use crate::renderer::WebDriverRenderer;
use crate::router::process_page;

/// Starts a crawl and returns a receiver that yields output records as they
/// are produced
///
/// Seeds the frontier with the keyword's search item, spawns
/// `max_concurrency` workers, and closes the record channel once every
/// worker has drained and signaled completion. Dropping the receiver stops
/// the workers at their next record send.
pub async fn start(config: &CrawlConfig) -> mpsc::Receiver<OutputRecord> {
    ::log::info!("Starting crawl for keyword: {}", config.keyword);

    let (result_tx, result_rx) = mpsc::channel::<OutputRecord>(10000);

    let frontier = Frontier::new(config.max_attempts);
    frontier.enqueue(WorkItem::search(&config.keyword)).await;

    let num_workers = config.max_concurrency;
    let (completion_tx, mut completion_rx) = mpsc::channel::<()>(num_workers);

    for worker_id in 0..num_workers {
        spawn_worker(
            worker_id,
            config.clone(),
            frontier.clone(),
            result_tx.clone(),
            completion_tx.clone(),
        );
    }

    // Each worker holds its own copies of the senders.
    drop(completion_tx);

    // Monitor task: close the result channel once all workers are done.
    tokio::spawn(async move {
        let mut completed_workers = 0;
        while completion_rx.recv().await.is_some() {
            completed_workers += 1;
            ::log::debug!(
                "Worker completed. {} of {} workers done.",
                completed_workers,
                num_workers
            );
            if completed_workers == num_workers {
                ::log::info!("All {} workers have completed", num_workers);
                break;
            }
        }
        drop(result_tx);
    });

    result_rx
}

/// Spawns a single worker task
///
/// The worker repeatedly dequeues an item, renders it, and runs the stage
/// router on the result. The WebDriver connection is made lazily on the
/// first item so idle workers never open a browser session.
fn spawn_worker(
    worker_id: usize,
    config: CrawlConfig,
    frontier: Frontier,
    result_tx: mpsc::Sender<OutputRecord>,
    completion_tx: mpsc::Sender<()>,
) {
    ::log::trace!("Spawning worker {}", worker_id);

    tokio::spawn(async move {
        worker_loop(worker_id, &config, &frontier, &result_tx).await;

        if let Err(e) = completion_tx.send(()).await {
            ::log::error!("Worker {} failed to send completion signal: {}", worker_id, e);
        } else {
            ::log::debug!("Worker {} signaled completion", worker_id);
        }
    });
}

/// Main processing loop for one worker
async fn worker_loop(
    worker_id: usize,
    config: &CrawlConfig,
    frontier: &Frontier,
    result_tx: &mpsc::Sender<OutputRecord>,
) {
    let settle_delay = Duration::from_millis(config.settle_delay_ms);
    let element_wait = Duration::from_millis(config.element_wait_ms);
    let mut renderer: Option<WebDriverRenderer> = None;

    while let Some(item) = frontier.next(worker_id).await {
        ::log::debug!(
            "Worker {} processing {} page: {}",
            worker_id,
            item.stage_name(),
            item.url()
        );

        // Lazily open a browser session the first time we actually have work.
        if renderer.is_none() {
            renderer =
                WebDriverRenderer::connect(&config.webdriver_url, settle_delay, element_wait).await;
        }

        let Some(active) = renderer.as_ref() else {
            let failed = frontier
                .record_failure(item, "failed to connect to WebDriver".to_string())
                .await;
            if let Some(record) = failed {
                if result_tx.send(record).await.is_err() {
                    break;
                }
            }
            continue;
        };

        match active.render(&item).await {
            Ok(html) => {
                let outcome = process_page(item, &html);

                // Records go out before follow-up work is queued, so an
                // emitted record is never lost to cancellation mid-step.
                for record in outcome.records {
                    ::log::info!("Emitting {} record", record.kind());
                    if result_tx.send(record).await.is_err() {
                        ::log::info!("Worker {} stopping: result channel closed", worker_id);
                        if let Some(renderer) = renderer {
                            renderer.close().await;
                        }
                        return;
                    }
                }

                for next in outcome.next {
                    frontier.enqueue(next).await;
                }
            }
            Err(e) => {
                let message = e.to_string();
                ::log::warn!("Worker {} failed to render {}: {}", worker_id, item.url(), message);

                // A lost session poisons the client; reconnect on the next item.
                if message.contains("session") {
                    if let Some(renderer) = renderer.take() {
                        renderer.close().await;
                    }
                }

                if let Some(record) = frontier.record_failure(item, message).await {
                    if result_tx.send(record).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    if let Some(renderer) = renderer {
        renderer.close().await;
    }

    ::log::debug!("Worker {} completed processing loop", worker_id);
}
