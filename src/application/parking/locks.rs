//! Per-vehicle mutual exclusion
//!
//! Enter and Exit for the same plate take the plate's mutex before opening
//! a transaction and keep it until the transaction is finished. Entries are
//! created on demand and removed once nobody holds or awaits them.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

use crate::domain::{DomainError, DomainResult};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

pub struct VehicleLocks {
    locks: Arc<LockMap>,
    timeout: Duration,
}

impl VehicleLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
            timeout,
        }
    }

    /// Wait up to the configured timeout for the plate's lock.
    pub async fn acquire(&self, vehicle_number: &str) -> DomainResult<VehicleGuard> {
        let mutex = Arc::clone(&self.locks.entry(vehicle_number.to_string()).or_default());

        match tokio::time::timeout(self.timeout, mutex.lock_owned()).await {
            Ok(guard) => Ok(VehicleGuard {
                locks: Arc::clone(&self.locks),
                vehicle_number: vehicle_number.to_string(),
                guard: Some(guard),
            }),
            Err(_) => {
                prune(&self.locks, vehicle_number);
                warn!(
                    vehicle_number,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Timed out waiting for vehicle lock"
                );
                Err(DomainError::SessionBusy(format!("vehicle {}", vehicle_number)))
            }
        }
    }

    /// Plates with a live lock entry
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

fn prune(locks: &LockMap, vehicle_number: &str) {
    locks.remove_if(vehicle_number, |_, mutex| Arc::strong_count(mutex) == 1);
}

/// Holds a plate's lock; released on drop.
#[derive(Debug)]
pub struct VehicleGuard {
    locks: Arc<LockMap>,
    vehicle_number: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for VehicleGuard {
    fn drop(&mut self) {
        self.guard.take();
        prune(&self.locks, &self.vehicle_number);
    }
}
