//! Union Wait Over a Set of Channels

use crate::channel::BoundedChannel;
use crate::error::SetError;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{self, Duration, Instant};

/// A registry of channels presented to one consumer as a single wait point
///
/// Membership is fixed at construction. Every member enqueue pings the
/// set's readiness hub, so [`wait_any`](ChannelSet::wait_any) suspends
/// with zero CPU usage until real work exists instead of round-robin
/// polling each channel with short receive timeouts.
///
/// Ready-member selection starts from a cursor that rotates on every
/// call, so no member can be starved while traffic keeps arriving on
/// another.
pub struct ChannelSet<I, T> {
    members: Vec<(I, BoundedChannel<T>)>,
    hub: Arc<Notify>,
    cursor: AtomicUsize,
}

impl<I: Copy + PartialEq, T> ChannelSet<I, T> {
    /// Build a set from distinct member channels
    ///
    /// Fails if the member list is empty, two members share an identity,
    /// or a channel already feeds another set.
    pub fn new(members: Vec<(I, BoundedChannel<T>)>) -> Result<Self, SetError> {
        if members.is_empty() {
            return Err(SetError::Empty);
        }
        for (i, (id, _)) in members.iter().enumerate() {
            if members[i + 1..].iter().any(|(other, _)| other == id) {
                return Err(SetError::DuplicateIdentity);
            }
        }

        let hub = Arc::new(Notify::new());
        for (_, channel) in &members {
            channel.attach_hub(Arc::clone(&hub))?;
        }

        Ok(Self {
            members,
            hub,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Block until at least one member has an item, or `timeout` elapses
    ///
    /// Returns the identity of one ready member, never an identity whose
    /// channel was empty at the moment of the readiness check. A zero
    /// timeout degrades to a single non-blocking readiness scan, which is
    /// what the consumer's drain loop uses.
    pub async fn wait_any(&self, timeout: Duration) -> Option<I> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(id) = self.poll_ready() {
                return Some(id);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            // A stale hub permit from an already-drained enqueue just
            // causes one extra readiness scan before re-suspending.
            if time::timeout(remaining, self.hub.notified()).await.is_err() {
                return None;
            }
        }
    }

    /// One fair scan over the members; no suspension
    fn poll_ready(&self) -> Option<I> {
        let n = self.members.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % n;
        for offset in 0..n {
            let (id, channel) = &self.members[(start + offset) % n];
            if !channel.is_empty() {
                return Some(*id);
            }
        }
        None
    }

    /// Look up a member channel by identity
    pub fn channel(&self, id: I) -> Option<&BoundedChannel<T>> {
        self.members
            .iter()
            .find(|(member, _)| *member == id)
            .map(|(_, channel)| channel)
    }

    /// Number of member channels
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members (never true for a constructed set)
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<I, T> fmt::Debug for ChannelSet<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSet")
            .field("members", &self.members.len())
            .finish()
    }
}
