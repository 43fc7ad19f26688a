//! Per-plan async mutexes.
//!
//! Every read-modify-write of a plan's `weeks` document runs while holding
//! that plan's lock, so two requests against the same plan cannot overwrite
//! each other's changes. Requests against different plans never contend.
//!
//! An entry lives only while someone holds or waits for it. The last
//! [`PlanGuard`] to drop removes it, so ids that never name a plan leave
//! nothing behind and at most one mutex exists per id at any time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::OwnedMutexGuard;

type PlanMutex = Arc<tokio::sync::Mutex<()>>;
type LockTable = Arc<Mutex<HashMap<String, PlanMutex>>>;

#[derive(Debug, Default, Clone)]
pub struct PlanLocks {
    inner: LockTable,
}

/// Exclusive access to one plan. Releases the lock on drop.
#[derive(Debug)]
pub struct PlanGuard {
    guard: Option<OwnedMutexGuard<()>>,
    plan_id: String,
    table: LockTable,
}

fn lock_table(table: &LockTable) -> MutexGuard<'_, HashMap<String, PlanMutex>> {
    table.lock().unwrap_or_else(|e| e.into_inner())
}

impl PlanLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `plan_id`.
    pub async fn acquire(&self, plan_id: &str) -> PlanGuard {
        let lock = {
            let mut map = lock_table(&self.inner);
            Arc::clone(map.entry(plan_id.to_owned()).or_default())
        };
        let guard = lock.lock_owned().await;
        PlanGuard {
            guard: Some(guard),
            plan_id: plan_id.to_owned(),
            table: Arc::clone(&self.inner),
        }
    }

    /// Number of plans with a live lock entry.
    pub fn len(&self) -> usize {
        lock_table(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PlanGuard {
    fn drop(&mut self) {
        // Release under the table lock so no acquirer can clone the entry
        // between the release and the handle count check.
        let mut map = lock_table(&self.table);
        drop(self.guard.take());
        let unused = map
            .get(&self.plan_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            map.remove(&self.plan_id);
        }
    }
}
