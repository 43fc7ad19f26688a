use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use sqlx::types::Json;

/// Status given to a freshly added task.
pub const PENDING_STATUS: &str = "Pending";

fn pending_status() -> String {
    PENDING_STATUS.to_owned()
}

/// Current UTC time formatted for comment and feedback timestamps.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the operation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Add,
    Delete,
    AddTask,
    DeleteTask,
    EditTask,
    UpdateTaskStatus,
    SubmitComment,
    GetFeedback,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::AddTask => "add_task",
            Self::DeleteTask => "delete_task",
            Self::EditTask => "edit_task",
            Self::UpdateTaskStatus => "update_task_status",
            Self::SubmitComment => "submit_comment",
            Self::GetFeedback => "get_feedback",
        };
        f.write_str(s)
    }
}

impl FromStr for OperationType {
    type Err = OperationTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "delete" => Ok(Self::Delete),
            "add_task" => Ok(Self::AddTask),
            "delete_task" => Ok(Self::DeleteTask),
            "edit_task" => Ok(Self::EditTask),
            "update_task_status" => Ok(Self::UpdateTaskStatus),
            "submit_comment" => Ok(Self::SubmitComment),
            "get_feedback" => Ok(Self::GetFeedback),
            other => Err(OperationTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`OperationType`] string.
#[derive(Debug, Clone)]
pub struct OperationTypeParseError(pub String);

impl fmt::Display for OperationTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid operation type: {:?}", self.0)
    }
}

impl std::error::Error for OperationTypeParseError {}

// ---------------------------------------------------------------------------
// Nested plan document
// ---------------------------------------------------------------------------
//
// Keys a client adds beyond the known fields are kept in `extra` so a stored
// document comes back exactly as it was written.

/// One week of a teaching plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub week: i64,
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One day within a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day: i64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The leaf unit of work in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub content: String,
    #[serde(default = "pending_status")]
    pub status: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// A new pending task with no comments or feedback.
    pub fn pending(task_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            content: content.into(),
            status: pending_status(),
            comments: Vec::new(),
            feedbacks: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A learner comment on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment: String,
    pub timestamp: String,
}

impl Comment {
    pub fn now(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            timestamp: timestamp_now(),
        }
    }
}

/// Model-generated advice attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback: String,
    pub timestamp: String,
}

impl Feedback {
    pub fn now(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            timestamp: timestamp_now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A teaching plan row. `weeks` holds the whole task hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanRow {
    pub plan_id: String,
    pub title: String,
    pub goal: String,
    pub weeks: Json<Vec<Week>>,
    pub resources: Json<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identifier and title of a plan, as returned by the plan listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlanSummary {
    pub plan_id: String,
    pub title: String,
}

/// One entry of the append-only operation history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OperationRecord {
    #[serde(skip_serializing, default)]
    pub id: i64,
    pub plan_id: String,
    pub operation_type: OperationType,
    pub details: Json<Value>,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn operation_type_display_roundtrip() {
        let variants = [
            OperationType::Add,
            OperationType::Delete,
            OperationType::AddTask,
            OperationType::DeleteTask,
            OperationType::EditTask,
            OperationType::UpdateTaskStatus,
            OperationType::SubmitComment,
            OperationType::GetFeedback,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: OperationType = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn operation_type_invalid() {
        assert!("rename".parse::<OperationType>().is_err());
    }

    #[test]
    fn operation_type_serializes_snake_case() {
        let v = serde_json::to_value(OperationType::UpdateTaskStatus).unwrap();
        assert_eq!(v, json!("update_task_status"));
    }

    #[test]
    fn task_defaults_fill_missing_fields() {
        let task: Task =
            serde_json::from_value(json!({"task_id": "week1_day1_a", "content": "Read"})).unwrap();
        assert_eq!(task.status, PENDING_STATUS);
        assert!(task.comments.is_empty());
        assert!(task.feedbacks.is_empty());
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let raw = json!({
            "week": 1,
            "theme": "basics",
            "days": [{
                "day": 2,
                "tasks": [{
                    "task_id": "week1_day2_a",
                    "content": "Read",
                    "status": "Done",
                    "comments": [],
                    "feedbacks": [],
                    "estimate": 30
                }]
            }]
        });
        let week: Week = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(week.extra.get("theme"), Some(&json!("basics")));
        assert_eq!(serde_json::to_value(&week).unwrap(), raw);
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let week: Week = serde_json::from_value(json!({"week": 3})).unwrap();
        assert!(week.days.is_empty());
        let day: Day = serde_json::from_value(json!({"day": 1})).unwrap();
        assert!(day.tasks.is_empty());
    }
}
