//! Single-Flight Module
//!
//! Serializes upstream calls per coordinate key so concurrent misses for the
//! same location wait for one fetch instead of issuing their own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::forecast::Coordinates;

type FlightLocks = HashMap<Coordinates, Arc<AsyncMutex<()>>>;

// == Flight Group ==
/// Per-key async locks. Different keys never contend.
///
/// A key stays in the map only while some caller holds or awaits its lock.
#[derive(Debug, Default)]
pub struct FlightGroup {
    locks: Mutex<FlightLocks>,
}

impl FlightGroup {
    pub fn new() -> Self {
        Self::default()
    }

    // == Acquire ==
    /// Waits until no other caller holds the flight for `key`.
    ///
    /// Callers must re-check the store after acquiring: the previous holder
    /// may already have stored what they were about to fetch. Dropping the
    /// returned future while it waits gives up the place in line and leaves
    /// no entry behind.
    pub async fn acquire(&self, key: Coordinates) -> FlightGuard<'_> {
        let lock = {
            let mut locks = self.locks();
            prune_idle(&mut locks);
            Arc::clone(locks.entry(key).or_default())
        };

        // Built before waiting so a cancelled waiter still runs the cleanup
        let mut flight = FlightGuard {
            group: self,
            key,
            guard: None,
        };
        flight.guard = Some(lock.lock_owned().await);
        flight
    }

    /// Number of keys with a flight currently held or awaited.
    pub fn in_flight(&self) -> usize {
        let mut locks = self.locks();
        prune_idle(&mut locks);
        locks.len()
    }

    fn locks(&self) -> MutexGuard<'_, FlightLocks> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drops the map entry for `key` once only the map references it.
    fn release(&self, key: &Coordinates) {
        let mut locks = self.locks();
        if locks
            .get(key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(key);
        }
    }
}

/// Removes locks nobody holds or waits for.
fn prune_idle(locks: &mut FlightLocks) {
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
}

// == Flight Guard ==
/// Held while a caller owns, or waits for, the flight for one key.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    group: &'a FlightGroup,
    key: Coordinates,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // Release first so the count seen by `release` covers other callers only
        self.guard.take();
        self.group.release(&self.key);
    }
}
