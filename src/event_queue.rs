//! Bounded, closable event queue shared by producers and workers.
//!
//! The queue is a bounded tokio mpsc channel. Producers clone the sender for the
//! duration of one enqueue; workers take turns on the single receiver. Closing
//! drops the queue's own sender: once every in-flight enqueue has finished and
//! the buffer is empty, [`EventQueue::recv`] returns `None`.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::error::QueueError;

pub struct EventQueue<E> {
    sender: RwLock<Option<mpsc::Sender<E>>>,
    receiver: Mutex<mpsc::Receiver<E>>,
    buffered: AtomicUsize,
    capacity: usize,
}

impl<E: Send + 'static> EventQueue<E> {
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity);
        }
        let (sender, receiver) = mpsc::channel(capacity);
        Ok(Self {
            sender: RwLock::new(Some(sender)),
            receiver: Mutex::new(receiver),
            buffered: AtomicUsize::new(0),
            capacity,
        })
    }

    /// Adds an event, waiting while the buffer is full.
    ///
    /// # Errors
    /// Returns [`QueueError::Closed`] once [`close`](Self::close) has been called.
    /// Producers must stop submitting before the queue is closed.
    pub async fn enqueue(&self, event: E) -> Result<(), QueueError> {
        let sender = self.sender.read().clone().ok_or(QueueError::Closed)?;
        let permit = sender.reserve().await.map_err(|_| QueueError::Closed)?;
        // Counted before the send so a worker can never decrement first.
        self.buffered.fetch_add(1, Ordering::SeqCst);
        permit.send(event);
        Ok(())
    }

    /// Next buffered event in FIFO order, waiting while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and drained. Cancel safe: dropping
    /// the future never loses an event.
    pub async fn recv(&self) -> Option<E> {
        let mut receiver = self.receiver.lock().await;
        let event = receiver.recv().await?;
        self.buffered.fetch_sub(1, Ordering::SeqCst);
        Some(event)
    }

    /// Stops accepting events. Buffered events stay available to [`recv`](Self::recv).
    pub fn close(&self) {
        if self.sender.write().take().is_some() {
            info!(buffered = self.len(), "Event queue closed");
        } else {
            debug!("Event queue already closed");
        }
    }

    /// Number of buffered, not yet received events. Racy by nature: use it for
    /// observability and draining only.
    pub fn len(&self) -> usize {
        self.buffered.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
