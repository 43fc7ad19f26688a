//! Whole-plan operations: add, get, delete, list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

use roadmap_db::models::{OperationType, PlanRow, PlanSummary, Week};
use roadmap_db::queries::plans::{self as plan_db, NewPlan};

use crate::error::ServiceError;
use crate::service::Roadmap;

/// A complete plan as stored and as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub plan_id: String,
    pub title: String,
    pub goal: String,
    pub weeks: Vec<Week>,
    #[serde(default)]
    pub resources: Map<String, Value>,
}

impl From<PlanRow> for PlanDocument {
    fn from(row: PlanRow) -> Self {
        Self {
            plan_id: row.plan_id,
            title: row.title,
            goal: row.goal,
            weeks: row.weeks.0,
            resources: row.resources.0,
        }
    }
}

impl Roadmap {
    /// Store a new plan.
    ///
    /// Fails with `Validation` for a blank id and `Conflict` when the id is
    /// already in use.
    pub async fn add_plan(&self, plan: &PlanDocument) -> Result<(), ServiceError> {
        let plan_id = plan.plan_id.as_str();
        if plan_id.trim().is_empty() {
            return Err(ServiceError::Validation("plan_id must not be empty".to_owned()));
        }

        {
            let _guard = self.locks.acquire(plan_id).await;
            if plan_db::plan_exists(&self.pool, plan_id).await? {
                return Err(ServiceError::Conflict(format!(
                    "Teaching plan {plan_id} already exists"
                )));
            }

            plan_db::insert_plan(
                &self.pool,
                &NewPlan {
                    plan_id,
                    title: &plan.title,
                    goal: &plan.goal,
                    weeks: &plan.weeks,
                    resources: &plan.resources,
                },
            )
            .await?;
        }

        info!(plan_id, weeks = plan.weeks.len(), "teaching plan added");
        self.record(
            plan_id,
            OperationType::Add,
            json!({"message": "Added new teaching plan with JSON content"}),
        )
        .await;
        Ok(())
    }

    /// Fetch a plan exactly as stored.
    pub async fn get_plan(&self, plan_id: &str) -> Result<PlanDocument, ServiceError> {
        Ok(self.load_plan(plan_id).await?.into())
    }

    /// Delete a plan. A second delete of the same id is `NotFound`.
    pub async fn delete_plan(&self, plan_id: &str) -> Result<(), ServiceError> {
        {
            let _guard = self.locks.acquire(plan_id).await;
            if !plan_db::delete_plan(&self.pool, plan_id).await? {
                return Err(ServiceError::plan_not_found());
            }
        }

        info!(plan_id, "teaching plan deleted");
        self.record(
            plan_id,
            OperationType::Delete,
            json!({"message": "Deleted teaching plan"}),
        )
        .await;
        Ok(())
    }

    /// Id and title of every plan, oldest first.
    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>, ServiceError> {
        Ok(plan_db::list_plan_summaries(&self.pool).await?)
    }
}
