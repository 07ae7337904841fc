use crate::modules::catalog::store::ProblemStore;
use crate::types::{
    error::{Result, TrackerError},
    tables::Problem,
};
use futures::{stream::FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

/// Concurrent batch upsert of the catalog into durable storage.
///
/// The input is partitioned into contiguous fixed-size batches and the
/// batch list is split into contiguous near-equal shares, one per worker.
/// Workers never share a batch, so the only synchronization is the
/// completion barrier and the error channel. A failing worker abandons its
/// remaining batches but does not cancel its siblings; the pipeline
/// reports the first collected error after all workers have joined.
pub struct IngestPipeline<S> {
    store: Arc<S>,
    batch_size: usize,
    workers: usize,
}

impl<S> IngestPipeline<S>
where
    S: ProblemStore + 'static,
{
    pub fn new(store: S, batch_size: usize, workers: usize) -> Self {
        Self {
            store: Arc::new(store),
            batch_size: batch_size.max(1),
            workers: workers.max(1),
        }
    }

    pub async fn run(&self, problems: Vec<Problem>) -> Result<()> {
        if problems.is_empty() {
            tracing::info!("No catalog records to ingest.");
            return Ok(());
        }

        let total = problems.len();
        let batches = partition(problems, self.batch_size);
        tracing::info!(
            "Start to ingest {} records in {} batches across {} workers.",
            total,
            batches.len(),
            self.workers
        );

        let (tx, mut rx) = mpsc::channel::<TrackerError>(self.workers);
        let mut tasks: FuturesUnordered<JoinHandle<()>> = FuturesUnordered::new();
        for share in worker_shares(batches, self.workers) {
            if share.is_empty() {
                continue;
            }

            let store = Arc::clone(&self.store);
            let tx = tx.clone();
            tasks.push(tokio::spawn(async move {
                for batch in share {
                    if let Err(e) = store.upsert_batch(&batch).await {
                        tracing::error!(
                            "a batch upsert failed, abandoning this worker's remaining batches: {}",
                            e
                        );
                        let _ = tx.try_send(e);
                        return;
                    }
                }
            }));
        }
        drop(tx);

        let mut aborted = false;
        while let Some(task) = tasks.next().await {
            if let Err(e) = task {
                tracing::error!("an ingest worker terminated abnormally: {:?}", e);
                aborted = true;
            }
        }

        if let Some(e) = rx.recv().await {
            return Err(e);
        }
        if aborted {
            return Err(TrackerError::Ingest(String::from(
                "an ingest worker terminated abnormally",
            )));
        }

        tracing::info!("{} records successfully ingested.", total);

        Ok(())
    }
}

fn partition<T>(items: Vec<T>, batch_size: usize) -> Vec<Vec<T>> {
    let mut batches = Vec::with_capacity(items.len() / batch_size + 1);
    let mut items = items.into_iter();
    loop {
        let batch: Vec<T> = items.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }

    batches
}

/// Splits the batch list into `workers` contiguous shares whose sizes
/// differ by at most one, so no batch is ever left unassigned.
fn worker_shares<T>(batches: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let total = batches.len();
    let mut shares = Vec::with_capacity(workers);
    let mut batches = batches.into_iter();
    let mut start = 0;
    for worker in 0..workers {
        let end = (worker + 1) * total / workers;
        shares.push(batches.by_ref().take(end - start).collect());
        start = end;
    }

    shares
}
