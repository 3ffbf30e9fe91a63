//! Resolve many documents in parallel against one shared context and pool.

use std::num::NonZeroUsize;

use crate::config::ResolutionConfig;
use crate::context::ResolutionContext;
use crate::diagnostics::Problem;
use crate::document::Document;
use crate::error::Error;
use crate::pool::IdentityPool;
use crate::walker;

/// A document after its resolution pass.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// The document with resolved references rewritten in place.
    pub document: Document,
    /// Problems found in this document, in traversal order.
    pub problems: Vec<Problem>,
}

/// Resolve `documents` on up to `workers` threads. Each document gets its own
/// walker; results come back in input order.
///
/// # Errors
///
/// Returns [`Error::WorkerPanicked`] if a worker thread panics.
pub fn resolve_documents(
    documents: Vec<Document>,
    context: &dyn ResolutionContext,
    pool: &IdentityPool,
    config: &ResolutionConfig,
    workers: NonZeroUsize,
) -> Result<Vec<ResolvedDocument>, Error> {
    let total = documents.len();
    let worker_count = workers.get().min(total.max(1));
    tracing::debug!(documents = total, workers = worker_count, "resolving batch");

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, Document)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, ResolvedDocument)>();

    for job in documents.into_iter().enumerate() {
        // job_rx is still held here, so the channel can't be disconnected.
        if job_tx.send(job).is_err() {
            break;
        }
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..worker_count)
            .map(|_| {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                return scope.spawn(move || {
                    for (index, mut document) in job_rx {
                        let problems = walker::resolve_document(&mut document, context, pool, config);
                        if result_tx.send((index, ResolvedDocument { document, problems })).is_err() {
                            break;
                        }
                    }
                });
            })
            .collect();

        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                tracing::warn!(worker, "resolution worker panicked");
                return Err(Error::WorkerPanicked { worker });
            }
        }
        return Ok(());
    })?;
    drop(result_tx);

    let mut results: Vec<(usize, ResolvedDocument)> = result_rx.iter().collect();
    results.sort_by_key(|(index, _)| return *index);
    return Ok(results.into_iter().map(|(_, resolved)| return resolved).collect());
}
