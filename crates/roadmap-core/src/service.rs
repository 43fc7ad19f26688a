//! The [`Roadmap`] service handle.
//!
//! Operations are implemented across the `plan`, `task`, `feedback` and
//! `audit` modules; this module holds the shared state and the
//! load-mutate-store cycle they all use.

use std::fmt;
use std::sync::Arc;

use sqlx::SqlitePool;

use roadmap_db::models::{PlanRow, Week};
use roadmap_db::queries::plans as plan_db;

use crate::error::ServiceError;
use crate::feedback::FeedbackModel;
use crate::locks::{PlanGuard, PlanLocks};

/// Entry point for every plan, task and feedback operation.
///
/// Cheap to clone; clones share the pool, the lock table and the model.
#[derive(Clone)]
pub struct Roadmap {
    pub(crate) pool: SqlitePool,
    pub(crate) locks: PlanLocks,
    pub(crate) model: Arc<dyn FeedbackModel>,
}

impl fmt::Debug for Roadmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roadmap")
            .field("model", &self.model.name())
            .field("locked_plans", &self.locks.len())
            .finish()
    }
}

/// A plan loaded under its lock, ready to be modified and stored.
pub(crate) struct LockedPlan {
    pub(crate) row: PlanRow,
    _guard: PlanGuard,
}

impl Roadmap {
    pub fn new(pool: SqlitePool, model: Arc<dyn FeedbackModel>) -> Self {
        Self {
            pool,
            locks: PlanLocks::new(),
            model,
        }
    }

    /// Fetch a plan row, mapping absence to `NotFound`.
    pub(crate) async fn load_plan(&self, plan_id: &str) -> Result<PlanRow, ServiceError> {
        plan_db::get_plan(&self.pool, plan_id)
            .await?
            .ok_or_else(ServiceError::plan_not_found)
    }

    /// Take the plan's lock, then load it.
    pub(crate) async fn lock_plan(&self, plan_id: &str) -> Result<LockedPlan, ServiceError> {
        let guard = self.locks.acquire(plan_id).await;
        let row = self.load_plan(plan_id).await?;
        Ok(LockedPlan { row, _guard: guard })
    }

    /// Write back the weeks of a locked plan and release the lock.
    pub(crate) async fn store_weeks(&self, plan: LockedPlan) -> Result<(), ServiceError> {
        plan_db::update_weeks(&self.pool, &plan.row.plan_id, &plan.row.weeks.0).await?;
        Ok(())
    }

    /// Load a plan's weeks, apply `edit`, and write the result back.
    ///
    /// Nothing is written when `edit` fails.
    pub(crate) async fn mutate_weeks<T, F>(&self, plan_id: &str, edit: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Vec<Week>) -> Result<T, ServiceError>,
    {
        let mut plan = self.lock_plan(plan_id).await?;
        let out = edit(&mut plan.row.weeks.0)?;
        self.store_weeks(plan).await?;
        Ok(out)
    }
}
