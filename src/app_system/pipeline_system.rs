use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::config::PipelineConfig;
use super::shutdown::{drain_queue, DrainOutcome, PhaseTracker, ShutdownPhase};
use crate::clients::ProductClient;
use crate::domain::UpdateEvent;
use crate::error::ConfigError;
use crate::event_queue::EventQueue;
use crate::product_store::ProductStore;
use crate::signal::CancelSignal;
use crate::worker_pool::WorkerPool;

/// The running pipeline: queue, store, and the workers between them.
///
/// Responsible for starting everything in dependency order and for the ordered
/// teardown in [`shutdown`](Self::shutdown).
pub struct PipelineSystem {
    config: PipelineConfig,
    queue: Arc<EventQueue<UpdateEvent>>,
    store: Arc<ProductStore>,
    pool: WorkerPool,
    cancel: CancelSignal,
    phase: PhaseTracker,
}

impl PipelineSystem {
    /// Creates the queue and store, then starts the workers.
    #[instrument(name = "pipeline_system", skip(config), fields(workers = config.workers))]
    pub fn start(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let queue = Arc::new(EventQueue::new(config.queue_capacity)?);
        let store = Arc::new(ProductStore::new());
        let cancel = CancelSignal::new();

        let worker_store = Arc::clone(&store);
        let pool = WorkerPool::start(
            Arc::clone(&queue),
            config.workers,
            cancel.subscribe(),
            move |event: &UpdateEvent| worker_store.apply(event),
        )?;

        info!(queue_capacity = queue.capacity(), "Pipeline started");
        Ok(Self {
            config,
            queue,
            store,
            pool,
            cancel,
            phase: PhaseTracker::new(),
        })
    }

    /// Client for producers and readers.
    pub fn client(&self) -> ProductClient {
        ProductClient::new(Arc::clone(&self.queue), Arc::clone(&self.store))
    }

    #[cfg(test)]
    pub fn phase(&self) -> ShutdownPhase {
        self.phase.current()
    }

    /// Lets the ingress layer see when it must stop accepting events.
    pub fn subscribe_phase(&self) -> watch::Receiver<ShutdownPhase> {
        self.phase.subscribe()
    }

    /// Signal that stops workers at their next iteration, even with events buffered.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Ordered teardown:
    /// 1. Publish `DrainRequested` and wait for `stop_ingress` (no new events after it)
    /// 2. Poll the queue until it is empty or the drain timeout passes
    /// 3. Close the queue so idle workers see closed-and-empty
    /// 4. Wait for every worker to exit
    ///
    /// A drain timeout is reported, not treated as an error: events still buffered
    /// are applied before the workers exit.
    #[instrument(skip(self, stop_ingress))]
    pub async fn shutdown<F>(self, stop_ingress: F) -> DrainOutcome
    where
        F: Future<Output = ()>,
    {
        info!("Shutting down pipeline");

        self.phase.advance(ShutdownPhase::DrainRequested);
        stop_ingress.await;

        self.phase.advance(ShutdownPhase::Draining);
        let outcome = drain_queue(
            &self.queue,
            self.config.drain_timeout,
            self.config.drain_poll_interval,
        )
        .await;
        if let DrainOutcome::TimedOut { remaining } = outcome {
            warn!(remaining, "Closing queue with events still buffered");
        }

        self.queue.close();
        self.phase.advance(ShutdownPhase::QueueClosed);

        self.pool.join().await;
        if self.cancel.is_cancelled() {
            warn!(unapplied = self.queue.len(), "Workers were cancelled before the queue emptied");
        }
        self.phase.advance(ShutdownPhase::Stopped);

        info!(products = self.store.len(), "Pipeline shutdown complete");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = PipelineConfig {
            workers: 0,
            ..PipelineConfig::default()
        };
        assert!(PipelineSystem::start(config).is_err());
    }

    #[tokio::test]
    async fn test_shutdown_walks_every_phase() {
        let system = PipelineSystem::start(PipelineConfig::default()).unwrap();
        let mut phases = system.subscribe_phase();
        assert_eq!(system.phase(), ShutdownPhase::Running);

        let initial = *phases.borrow_and_update();
        let recorder = tokio::spawn(async move {
            let mut seen = vec![initial];
            while phases.changed().await.is_ok() {
                let phase = *phases.borrow_and_update();
                seen.push(phase);
                if phase == ShutdownPhase::Stopped {
                    break;
                }
            }
            seen
        });

        let outcome = system.shutdown(async {}).await;
        assert_eq!(outcome, DrainOutcome::Drained);

        let seen = recorder.await.unwrap();
        assert_eq!(seen.first(), Some(&ShutdownPhase::Running));
        assert_eq!(seen.last(), Some(&ShutdownPhase::Stopped));
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn test_ingress_is_stopped_before_draining() {
        let system = PipelineSystem::start(PipelineConfig::default()).unwrap();
        let phases = system.subscribe_phase();

        system
            .shutdown(async move {
                assert_eq!(*phases.borrow(), ShutdownPhase::DrainRequested);
            })
            .await;
    }

    #[tokio::test]
    async fn test_client_sees_applied_updates() {
        let system = PipelineSystem::start(PipelineConfig::default()).unwrap();
        let client = system.client();

        client.submit_update(UpdateEvent::price("abc", 10.0)).await.unwrap();
        client.submit_update(UpdateEvent::stock("abc", 5)).await.unwrap();
        system.shutdown(async {}).await;

        assert_eq!(client.get_product("abc"), Some(Product::new("abc", 10.0, 5)));
    }

    #[tokio::test]
    async fn test_cancelled_workers_still_complete_shutdown() {
        let config = PipelineConfig {
            drain_timeout: Duration::from_millis(100),
            drain_poll_interval: Duration::from_millis(10),
            ..PipelineConfig::default()
        };
        let system = PipelineSystem::start(config).unwrap();
        let client = system.client();

        system.cancel_signal().cancel();
        // Let the workers observe the signal before anything is queued.
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.submit_update(UpdateEvent::stock("late", 1)).await.unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(2), system.shutdown(async {}))
            .await
            .expect("shutdown should finish even with cancelled workers");
        assert_eq!(outcome, DrainOutcome::TimedOut { remaining: 1 });
        assert_eq!(client.get_product("late"), None);
    }
}
