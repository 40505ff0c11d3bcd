//! Fixed-size pool of workers draining an [`EventQueue`].

use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};

use crate::error::PoolError;
use crate::event_queue::EventQueue;
use crate::signal::CancelListener;

/// Handles of the running workers. [`join`](Self::join) is the completion barrier.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `workers` tasks that pull from `queue` and call `apply` on each event.
    ///
    /// A worker stops when `cancel` fires (without taking further events) or when
    /// the queue is closed and empty.
    pub fn start<E, F>(
        queue: Arc<EventQueue<E>>,
        workers: usize,
        cancel: CancelListener,
        apply: F,
    ) -> Result<Self, PoolError>
    where
        E: Debug + Send + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let apply = Arc::new(apply);
        let handles = (1..=workers)
            .map(|worker_id| {
                let span = info_span!("worker", worker_id);
                tokio::spawn(
                    run_worker(
                        worker_id,
                        Arc::clone(&queue),
                        cancel.clone(),
                        Arc::clone(&apply),
                    )
                    .instrument(span),
                )
            })
            .collect();

        info!(workers, "Worker pool started");
        Ok(Self { handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits until every worker has exited.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Worker task failed");
            }
        }
        info!("All workers stopped");
    }
}

async fn run_worker<E, F>(
    worker_id: usize,
    queue: Arc<EventQueue<E>>,
    mut cancel: CancelListener,
    apply: Arc<F>,
) where
    E: Debug + Send + 'static,
    F: Fn(&E) + Send + Sync + 'static,
{
    debug!("Worker starting");
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Cancelled, worker stopping");
                return;
            }
            event = queue.recv() => event,
        };

        let Some(event) = event else {
            info!("Queue closed, worker stopping");
            return;
        };

        apply_isolated(worker_id, apply.as_ref(), &event);
    }
}

/// Runs one apply so that a panic costs only the event that caused it.
fn apply_isolated<E, F>(worker_id: usize, apply: &F, event: &E)
where
    E: Debug,
    F: Fn(&E),
{
    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| apply(event))) {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(worker_id, ?event, reason = %reason, "Apply panicked, event skipped");
    }
}
