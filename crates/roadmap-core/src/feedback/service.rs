use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};

use roadmap_db::models::{OperationType, timestamp_now};

use super::prompt::feedback_prompt;
use crate::document::{Feedback, find_task, find_task_mut};
use crate::error::ServiceError;
use crate::service::Roadmap;

impl Roadmap {
    /// Ask the model for advice on a task and store the reply on it.
    ///
    /// The task is looked up by scanning the whole plan. The plan stays
    /// locked during the model call, and nothing is written if the call
    /// fails.
    pub async fn get_feedback(
        &self,
        plan_id: &str,
        task_id: &str,
        comment: &str,
    ) -> Result<String, ServiceError> {
        let mut plan = self.lock_plan(plan_id).await?;

        let task_content = find_task(&plan.row.weeks.0, task_id)
            .map(|task| task.content.clone())
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Task content not found for task_id: {task_id}"))
            })?;

        let prompt = feedback_prompt(
            &plan.row.title,
            &plan.row.goal,
            &plan.row.weeks.0,
            &task_content,
            comment,
        )
        .context("failed to serialize plan for the feedback prompt")?;

        let feedback = self.model.complete(&prompt).await.map_err(|e| {
            warn!(plan_id, task_id, model = self.model.name(), "feedback model call failed: {e:#}");
            ServiceError::Upstream(e)
        })?;

        find_task_mut(&mut plan.row.weeks.0, task_id)
            .ok_or_else(ServiceError::task_not_found)?
            .feedbacks
            .push(Feedback::now(&feedback));
        self.store_weeks(plan).await?;

        info!(plan_id, task_id, chars = feedback.len(), "feedback stored");
        self.record(
            plan_id,
            OperationType::GetFeedback,
            json!({
                "task_id": task_id,
                "feedback": feedback,
                "timestamp": timestamp_now(),
            }),
        )
        .await;
        Ok(feedback)
    }
}
