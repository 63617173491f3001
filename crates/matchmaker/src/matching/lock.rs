use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::domain::RequestId;

/// Serializes recommendation runs per request id. Runs for different ids
/// proceed in parallel.
#[derive(Debug, Default)]
pub struct RequestLocks {
    in_flight: Mutex<HashSet<RequestId>>,
    released: Condvar,
}

impl RequestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no other run holds `request_id`, then claim it.
    pub fn acquire(&self, request_id: &RequestId) -> RequestLockGuard<'_> {
        let mut in_flight = self.lock_set();
        while in_flight.contains(request_id) {
            in_flight = self
                .released
                .wait(in_flight)
                .unwrap_or_else(PoisonError::into_inner);
        }
        in_flight.insert(request_id.clone());

        RequestLockGuard {
            locks: self,
            request_id: request_id.clone(),
        }
    }

    pub fn is_held(&self, request_id: &RequestId) -> bool {
        self.lock_set().contains(request_id)
    }

    fn lock_set(&self) -> MutexGuard<'_, HashSet<RequestId>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the request id when dropped, including on unwind.
#[derive(Debug)]
pub struct RequestLockGuard<'a> {
    locks: &'a RequestLocks,
    request_id: RequestId,
}

impl Drop for RequestLockGuard<'_> {
    fn drop(&mut self) {
        self.locks.lock_set().remove(&self.request_id);
        self.locks.released.notify_all();
    }
}
