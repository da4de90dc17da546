//! Bounded, drop-on-full queue between the redirect handler and the click workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::click_event::ClickEvent;

/// Producer half of the click queue.
///
/// Cheap to clone; every clone feeds the same bounded channel. The queue is
/// closed once all clones are dropped, at which point workers drain what is
/// left and exit.
#[derive(Clone)]
pub struct ClickQueue {
    sender: mpsc::Sender<ClickEvent>,
    dropped: Arc<AtomicU64>,
}

/// Consumer half of the click queue, owned by the worker pool.
pub struct ClickReceiver {
    receiver: mpsc::Receiver<ClickEvent>,
}

impl ClickQueue {
    /// Creates a queue holding at most `capacity` pending events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Configuration validation rejects that
    /// value before the queue is built.
    pub fn new(capacity: usize) -> (Self, ClickReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);

        (
            Self {
                sender,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            ClickReceiver { receiver },
        )
    }

    /// Offers an event without waiting.
    ///
    /// Returns `false` when the event was dropped because the queue is full or
    /// closed. Dropping is the expected outcome under load; callers carry on
    /// with the redirect either way.
    pub fn try_enqueue(&self, event: ClickEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.record_drop();
                tracing::warn!(link_id = event.link_id, "Click queue is full, dropping click event");
                false
            }
            Err(TrySendError::Closed(event)) => {
                self.record_drop();
                tracing::warn!(link_id = event.link_id, "Click queue is closed, dropping click event");
                false
            }
        }
    }

    /// Number of events dropped since the queue was created.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Free slots at this instant.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }

    /// Returns true once the consumer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_dropped_total").increment(1);
    }
}

impl ClickReceiver {
    /// Waits for the next event.
    ///
    /// Returns `None` once every producer is gone and the buffer is empty.
    pub async fn recv(&mut self) -> Option<ClickEvent> {
        self.receiver.recv().await
    }

    /// Takes an event if one is immediately available.
    pub fn try_recv(&mut self) -> Option<ClickEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of events currently buffered.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
