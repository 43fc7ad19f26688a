//! Task operations on a plan's `weeks` document.
//!
//! Every operation validates the task id before touching storage. Adding and
//! deleting use the week/day encoded in the id; editing, status changes and
//! comments scan the whole document for the first task with that id.

use serde_json::json;
use tracing::info;

use roadmap_db::models::{OperationType, timestamp_now};

use crate::document::{Comment, Task, find_day_mut, find_task_mut, parse_task_id};
use crate::error::ServiceError;
use crate::service::Roadmap;

impl Roadmap {
    /// Append a pending task to the day encoded in `task_id`.
    pub async fn add_task(
        &self,
        plan_id: &str,
        task_id: &str,
        content: &str,
    ) -> Result<(), ServiceError> {
        let location = parse_task_id(task_id)?;

        self.mutate_weeks(plan_id, |weeks| {
            let day = find_day_mut(weeks, location).ok_or_else(|| {
                ServiceError::NotFound("Week or Day not found in plan".to_owned())
            })?;
            day.tasks.push(Task::pending(task_id, content));
            Ok(())
        })
        .await?;

        info!(plan_id, task_id, "task added");
        self.record(
            plan_id,
            OperationType::AddTask,
            json!({
                "task_id": task_id,
                "content": content,
                "timestamp": timestamp_now(),
            }),
        )
        .await;
        Ok(())
    }

    /// Remove every task with this id from the day encoded in `task_id`.
    pub async fn delete_task(&self, plan_id: &str, task_id: &str) -> Result<(), ServiceError> {
        let location = parse_task_id(task_id)?;

        self.mutate_weeks(plan_id, |weeks| {
            let day = find_day_mut(weeks, location).ok_or_else(ServiceError::task_not_found)?;
            let before = day.tasks.len();
            day.tasks.retain(|task| task.task_id != task_id);
            if day.tasks.len() == before {
                return Err(ServiceError::task_not_found());
            }
            Ok(())
        })
        .await?;

        info!(plan_id, task_id, "task deleted");
        self.record(
            plan_id,
            OperationType::DeleteTask,
            json!({
                "task_id": task_id,
                "timestamp": timestamp_now(),
            }),
        )
        .await;
        Ok(())
    }

    /// Replace a task's content, and its status unless `status` is empty.
    pub async fn edit_task(
        &self,
        plan_id: &str,
        task_id: &str,
        content: &str,
        status: &str,
    ) -> Result<(), ServiceError> {
        parse_task_id(task_id)?;

        self.mutate_weeks(plan_id, |weeks| {
            let task = find_task_mut(weeks, task_id).ok_or_else(ServiceError::task_not_found)?;
            task.content = content.to_owned();
            if !status.is_empty() {
                task.status = status.to_owned();
            }
            Ok(())
        })
        .await?;

        info!(plan_id, task_id, "task edited");
        self.record(
            plan_id,
            OperationType::EditTask,
            json!({
                "task_id": task_id,
                "updated_task_data": {
                    "content": content,
                    "status": status,
                },
                "timestamp": timestamp_now(),
            }),
        )
        .await;
        Ok(())
    }

    /// Set a task's status.
    pub async fn update_task_status(
        &self,
        plan_id: &str,
        task_id: &str,
        status: &str,
    ) -> Result<(), ServiceError> {
        parse_task_id(task_id)?;

        self.mutate_weeks(plan_id, |weeks| {
            let task = find_task_mut(weeks, task_id).ok_or_else(ServiceError::task_not_found)?;
            task.status = status.to_owned();
            Ok(())
        })
        .await?;

        info!(plan_id, task_id, status, "task status updated");
        self.record(
            plan_id,
            OperationType::UpdateTaskStatus,
            json!({
                "task_id": task_id,
                "status": status,
                "timestamp": timestamp_now(),
            }),
        )
        .await;
        Ok(())
    }

    /// Attach a timestamped comment to a task.
    pub async fn submit_comment(
        &self,
        plan_id: &str,
        task_id: &str,
        comment: &str,
    ) -> Result<(), ServiceError> {
        parse_task_id(task_id)?;

        self.mutate_weeks(plan_id, |weeks| {
            let task = find_task_mut(weeks, task_id).ok_or_else(ServiceError::task_not_found)?;
            task.comments.push(Comment::now(comment));
            Ok(())
        })
        .await?;

        info!(plan_id, task_id, "comment submitted");
        self.record(
            plan_id,
            OperationType::SubmitComment,
            json!({
                "task_id": task_id,
                "comment": comment,
                "timestamp": timestamp_now(),
            }),
        )
        .await;
        Ok(())
    }
}
