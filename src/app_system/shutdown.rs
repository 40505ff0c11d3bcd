use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::event_queue::EventQueue;

/// Where the pipeline is in its teardown. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShutdownPhase {
    Running,
    DrainRequested,
    Draining,
    QueueClosed,
    Stopped,
}

impl ShutdownPhase {
    /// Whether producers may still submit events.
    pub fn accepts_events(self) -> bool {
        self == ShutdownPhase::Running
    }
}

impl fmt::Display for ShutdownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownPhase::Running => "running",
            ShutdownPhase::DrainRequested => "drain_requested",
            ShutdownPhase::Draining => "draining",
            ShutdownPhase::QueueClosed => "queue_closed",
            ShutdownPhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Publishes the current [`ShutdownPhase`] to any number of observers.
#[derive(Debug)]
pub struct PhaseTracker {
    tx: watch::Sender<ShutdownPhase>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ShutdownPhase::Running);
        Self { tx }
    }

    #[cfg(test)]
    pub fn current(&self) -> ShutdownPhase {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShutdownPhase> {
        self.tx.subscribe()
    }

    /// Moves to `next`. Requests to go backwards or stay put are ignored.
    pub fn advance(&self, next: ShutdownPhase) {
        let advanced = self.tx.send_if_modified(|phase| {
            if next > *phase {
                *phase = next;
                true
            } else {
                false
            }
        });
        if advanced {
            info!(phase = %next, "Shutdown phase changed");
        }
    }
}

/// Result of the timed drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The queue reported empty before the deadline.
    Drained,
    /// The deadline passed with events still buffered. They are still delivered
    /// to workers after the queue is closed.
    TimedOut { remaining: usize },
}

/// Polls the queue length every `poll_interval` until it reaches zero or
/// `timeout` has elapsed.
pub async fn drain_queue<E: Send + 'static>(
    queue: &EventQueue<E>,
    timeout: Duration,
    poll_interval: Duration,
) -> DrainOutcome {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = queue.len();
        if remaining == 0 {
            info!("Event queue drained");
            return DrainOutcome::Drained;
        }
        if Instant::now() >= deadline {
            warn!(remaining, timeout_ms = timeout.as_millis() as u64, "Drain timed out");
            return DrainOutcome::TimedOut { remaining };
        }
        info!(remaining, "Draining queue");
        tokio::time::sleep(poll_interval).await;
    }
}
