//! Bounded FIFO Channel Implementation

use crate::error::{SendError, SetError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::sync::Notify;
use tokio::time::{self, Duration, Instant};

/// Fixed-capacity FIFO channel for one-way message passing between tasks
///
/// The handle is cheap to clone; all clones address the same queue.
/// Capacity is fixed at construction and never changes. Suspension is
/// event-driven: senders park on a not-full notification, receivers on a
/// not-empty notification, and an optional set-level readiness hub is
/// pinged on every enqueue so a [`ChannelSet`](crate::ChannelSet) consumer
/// wakes without polling.
pub struct BoundedChannel<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    /// Queue mutex, held only for push/pop, never across an await
    queue: Mutex<VecDeque<T>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
    /// Readiness hub of the owning channel set, installed once
    hub: OnceLock<Arc<Notify>>,
}

impl<T> Clone for BoundedChannel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> BoundedChannel<T> {
    /// Create a channel with the given capacity (must be >= 1)
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "channel capacity must be at least 1");
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity,
                not_empty: Notify::new(),
                not_full: Notify::new(),
                hub: OnceLock::new(),
            }),
        }
    }

    /// Enqueue without blocking; rejects the item if the channel is full
    pub fn try_send(&self, item: T) -> Result<(), SendError<T>> {
        {
            let mut queue = self.shared.queue();
            if queue.len() >= self.shared.capacity {
                return Err(SendError::Full(item));
            }
            queue.push_back(item);
        }
        self.shared.signal_ready();
        Ok(())
    }

    /// Enqueue, waiting up to `timeout` for capacity to free up
    ///
    /// Returns the item inside [`SendError::Timeout`] if no receiver made
    /// room within the window.
    pub async fn send(&self, item: T, timeout: Duration) -> Result<(), SendError<T>> {
        let deadline = Instant::now() + timeout;
        let mut item = item;
        loop {
            match self.try_send(item) {
                Ok(()) => return Ok(()),
                Err(err) => item = err.into_inner(),
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SendError::Timeout(item));
            }
            if time::timeout(remaining, self.shared.not_full.notified())
                .await
                .is_err()
            {
                return Err(SendError::Timeout(item));
            }
        }
    }

    /// Latest-value-wins enqueue: never blocks and never fails
    ///
    /// If the channel is full the oldest queued item is displaced and
    /// returned, so a capacity-1 channel always holds the most recent
    /// sample. Numeric telemetry channels use this mode: a stale speed
    /// reading is worthless once a fresher one exists.
    pub fn send_latest(&self, item: T) -> Option<T> {
        let displaced = {
            let mut queue = self.shared.queue();
            let displaced = if queue.len() >= self.shared.capacity {
                queue.pop_front()
            } else {
                None
            };
            queue.push_back(item);
            displaced
        };
        self.shared.signal_ready();
        displaced
    }

    /// Dequeue the oldest item without blocking
    pub fn try_recv(&self) -> Option<T> {
        let item = self.shared.queue().pop_front();
        if item.is_some() {
            self.shared.not_full.notify_one();
        }
        item
    }

    /// Dequeue the oldest item, waiting up to `timeout` for one to arrive
    pub async fn recv(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(item) = self.try_recv() {
                return Some(item);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            if time::timeout(remaining, self.shared.not_empty.notified())
                .await
                .is_err()
            {
                return None;
            }
        }
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.shared.queue().len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity of the channel
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Install the readiness hub of the owning set; once only
    pub(crate) fn attach_hub(&self, hub: Arc<Notify>) -> Result<(), SetError> {
        self.shared
            .hub
            .set(hub)
            .map_err(|_| SetError::AlreadyAttached)
    }
}

impl<T> Shared<T> {
    fn queue(&self) -> MutexGuard<'_, VecDeque<T>> {
        // A poisoning panic cannot leave the queue itself in a bad state;
        // push/pop complete before any caller code runs.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn signal_ready(&self) {
        self.not_empty.notify_one();
        if let Some(hub) = self.hub.get() {
            hub.notify_one();
        }
    }
}
