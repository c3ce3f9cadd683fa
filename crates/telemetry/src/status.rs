//! Shared Car Status Record

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The car status record guarded by [`SharedStatus`]
///
/// Speed and rpm are written by the aggregator from the numeric sample
/// channels; the ventilation flag and fuel level are advisory fields
/// available to whichever collaborator renders the record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarStatus {
    /// Vehicle speed (km/h)
    pub speed: u32,
    /// Engine speed (rpm)
    pub rpm: u32,
    /// Last known ventilation health
    pub ventilation_ok: bool,
    /// Last known fuel level (liters)
    pub fuel_level: f32,
}

/// Lock-guarded handle to the single [`CarStatus`] record
///
/// Every read or write goes through [`with_lock`](SharedStatus::with_lock);
/// no unguarded accessor exists. The handle is cheap to clone and all
/// clones guard the same record. The inner lock is an async mutex because
/// the aggregator holds it across an entire drain pass, which awaits.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus {
    inner: Arc<Mutex<CarStatus>>,
}

impl SharedStatus {
    /// Create a record with zero/false defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the record
    ///
    /// The lock is released on every exit path, including panics inside
    /// `f` and cancellation of the awaiting task.
    pub async fn with_lock<R>(&self, f: impl FnOnce(&mut CarStatus) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }

    /// Lock-scoped copy of the record for display collaborators
    pub async fn snapshot(&self) -> CarStatus {
        *self.inner.lock().await
    }

    /// Lock guard for a multi-await critical section
    ///
    /// Used by the aggregator to keep the record consistent across one
    /// full drain pass rather than per message.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, CarStatus> {
        self.inner.lock().await
    }
}
