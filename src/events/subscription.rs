//! A live, cancellable registration with the notification source.

use futures_util::{pin_mut, Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::events::source::StreamError;

/// Error raised when disposing a subscription fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The subscription was already cancelled.
    #[error("subscription already cancelled")]
    AlreadyCancelled,
}

/// One active registration for one stream type.
///
/// Owns the drain task delivering events to listeners. The lifecycle is
/// single-use: once cancelled, a subscription never becomes active again.
/// Cancellation stops further delivery but does not interrupt a listener
/// invocation already in progress.
pub struct Subscription {
    stream_name: &'static str,
    task: JoinHandle<()>,
    cancelled: AtomicBool,
}

impl Subscription {
    /// Spawn a drain task over `events`, delivering each hash to `deliver`.
    ///
    /// `Err` items are logged and skipped; the stream keeps being read so a
    /// single bad event never silences the remaining listeners.
    pub(crate) fn spawn<S, F>(stream_name: &'static str, events: S, mut deliver: F) -> Self
    where
        S: Stream<Item = Result<String, StreamError>> + Send + 'static,
        F: FnMut(&str) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            pin_mut!(events);
            while let Some(event) = events.next().await {
                match event {
                    Ok(hash) => deliver(&hash),
                    Err(error) => {
                        tracing::error!(
                            stream = stream_name,
                            error = %error,
                            "Notification stream reported an error"
                        );
                    }
                }
            }
            tracing::debug!(stream = stream_name, "Notification stream ended");
        });

        Self {
            stream_name,
            task,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Stop delivery. Fails (never panics) if already cancelled.
    pub fn cancel(&self) -> Result<(), SubscriptionError> {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return Err(SubscriptionError::AlreadyCancelled);
        }
        self.task.abort();
        Ok(())
    }

    /// Whether events are still being delivered.
    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    /// The stream this subscription drains.
    pub fn stream_name(&self) -> &'static str {
        self.stream_name
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
