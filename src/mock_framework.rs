//! # Mock Framework
//!
//! Utilities for testing the worker pool in isolation.
//!
//! Use [`create_recording_apply`] to get an apply callback and a receiver.
//! Then use [`expect_applied`] to assert which events the workers handed over.

use std::time::Duration;
use tokio::sync::mpsc;

/// How long [`expect_applied`] waits before giving up.
const EXPECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Creates an apply callback that forwards a clone of every event it sees.
///
/// # Testing Strategy
/// Pool tests don't need a real store. The callback sends each applied event to
/// a channel we control, so a test can inspect exactly what was applied and in
/// which order a single worker saw it.
pub fn create_recording_apply<E>() -> (
    impl Fn(&E) + Send + Sync + 'static,
    mpsc::UnboundedReceiver<E>,
)
where
    E: Clone + Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let apply = move |event: &E| {
        let _ = sender.send(event.clone());
    };
    (apply, receiver)
}

/// Next applied event, or `None` if nothing arrives in time.
pub async fn expect_applied<E>(receiver: &mut mpsc::UnboundedReceiver<E>) -> Option<E> {
    tokio::time::timeout(EXPECT_TIMEOUT, receiver.recv())
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_apply() {
        let (apply, mut receiver) = create_recording_apply::<String>();
        apply(&"first".to_string());
        apply(&"second".to_string());

        assert_eq!(expect_applied(&mut receiver).await.as_deref(), Some("first"));
        assert_eq!(expect_applied(&mut receiver).await.as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expect_applied_times_out() {
        let (_apply, mut receiver) = create_recording_apply::<u32>();
        assert_eq!(expect_applied(&mut receiver).await, None);
    }
}
