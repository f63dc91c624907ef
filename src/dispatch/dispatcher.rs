//! Work dispatcher - fans a URL list out to the fetch client
//!
//! Each target runs as its own task: fetch, parse, normalize. Results are
//! collected as tasks finish and handed to the sink in completion order.
//! A failure is always confined to the URL that produced it.

use crate::client::FetchClient;
use crate::dispatch::batch::BatchResult;
use crate::extract::{normalize_record, now_iso_utc, CompanyRecord, PageParser};
use crate::output::RecordSink;
use crate::url::prepare_targets;
use crate::HarvestError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Completions between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Runs a batch of company pages through fetch, parse and normalize
pub struct Dispatcher {
    client: Arc<FetchClient>,
    parser: Arc<dyn PageParser>,
    slots: Arc<Semaphore>,
}

impl Dispatcher {
    /// Creates a dispatcher allowing `concurrency` URLs in progress at once
    ///
    /// This bound is independent of the fetch client's request bound.
    pub fn new(client: Arc<FetchClient>, parser: Arc<dyn PageParser>, concurrency: usize) -> Self {
        Self {
            client,
            parser,
            slots: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Stops starting new URLs; ones already in progress finish, later
    /// ones are recorded as rejected
    pub fn close(&self) {
        self.slots.close();
    }

    /// Processes every valid company URL in `urls`
    ///
    /// Invalid and duplicate entries are dropped first. When nothing is
    /// left the run completes immediately with an empty result.
    ///
    /// # Arguments
    ///
    /// * `urls` - Raw input URLs
    /// * `sink` - Receives each record and error as it completes
    ///
    /// # Returns
    ///
    /// Every target exactly once, either in `records` or in `errors`
    pub async fn run(&self, urls: &[String], sink: &mut dyn RecordSink) -> BatchResult {
        let targets = match prepare_targets(urls) {
            Ok(targets) => targets,
            Err(e) => {
                tracing::warn!("{} ({} input entries)", e, urls.len());
                return BatchResult::new();
            }
        };

        tracing::info!("Dispatching {} company pages", targets.len());

        let mut tasks = JoinSet::new();
        for url in &targets {
            let url = url.clone();
            let client = Arc::clone(&self.client);
            let parser = Arc::clone(&self.parser);
            let slots = Arc::clone(&self.slots);

            tasks.spawn(async move {
                let outcome = match slots.acquire_owned().await {
                    Ok(_permit) => process_url(&client, parser.as_ref(), &url).await,
                    Err(_) => Err(HarvestError::FetchRejected {
                        url: url.clone(),
                        reason: "dispatcher closed".to_string(),
                    }),
                };
                (url, outcome)
            });
        }

        let total = targets.len();
        let mut pending: HashSet<String> = targets.iter().cloned().collect();
        let mut batch = BatchResult::new();
        let start = Instant::now();

        while let Some(joined) = tasks.join_next().await {
            let (url, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Dispatch task failed: {}", e);
                    continue;
                }
            };
            pending.remove(&url);
            record_outcome(&mut batch, sink, url, outcome);

            let done = batch.completed();
            if done % PROGRESS_INTERVAL == 0 {
                let elapsed = start.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 { done as f64 / elapsed } else { 0.0 };
                tracing::info!(
                    "Progress: {}/{} pages done, {} errors, {:.2} pages/sec",
                    done,
                    total,
                    batch.errors.len(),
                    rate
                );
            }
        }

        // Tasks that panicked never reported back
        for url in targets.iter().filter(|u| pending.contains(*u)) {
            record_failure(&mut batch, sink, url.clone(), "task panicked".to_string());
        }

        let stats = batch.stats();
        tracing::info!(
            "Dispatch complete: {} records, {} errors in {:?}",
            stats.records,
            stats.errors,
            start.elapsed()
        );

        batch
    }
}

/// Fetches, parses and normalizes one page
async fn process_url(
    client: &FetchClient,
    parser: &dyn PageParser,
    url: &str,
) -> Result<CompanyRecord, HarvestError> {
    let html = client.fetch(url).await?;

    let record = parser
        .parse(&html, url)
        .map_err(|source| HarvestError::Extract {
            url: url.to_string(),
            source,
        })?;

    let mut record = normalize_record(record);
    if record.url.is_none() {
        record.url = Some(url.to_string());
    }
    if record.scraped_at.is_none() {
        record.scraped_at = Some(now_iso_utc());
    }

    Ok(record)
}

fn record_outcome(
    batch: &mut BatchResult,
    sink: &mut dyn RecordSink,
    url: String,
    outcome: Result<CompanyRecord, HarvestError>,
) {
    match outcome {
        Ok(record) => match sink.write_record(&record) {
            Ok(()) => {
                tracing::info!(url = %url, "Scraped {}", record.name.as_deref().unwrap_or("company"));
                batch.push_record(record);
            }
            Err(e) => record_failure(batch, sink, url, HarvestError::Output(e).to_string()),
        },
        Err(e) => record_failure(batch, sink, url, e.to_string()),
    }
}

fn record_failure(batch: &mut BatchResult, sink: &mut dyn RecordSink, url: String, error: String) {
    tracing::warn!(url = %url, "Failed: {}", error);
    if let Err(e) = sink.write_error(&url, &error) {
        tracing::warn!(url = %url, "Could not record error in sink: {}", e);
    }
    batch.push_error(url, error);
}
