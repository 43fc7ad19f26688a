//! Positional task identifiers: `week{N}_day{M}_{suffix}`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing a task id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskIdError {
    #[error("invalid task id {0:?}: expected week<N>_day<M>_<suffix>")]
    MissingDay(String),

    #[error("invalid task id {id:?}: {segment:?} is not week<N>")]
    BadWeek { id: String, segment: String },

    #[error("invalid task id {id:?}: {segment:?} is not day<M>")]
    BadDay { id: String, segment: String },
}

/// Week and day numbers encoded in a task id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskLocation {
    pub week: i64,
    pub day: i64,
}

impl fmt::Display for TaskLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week{}_day{}", self.week, self.day)
    }
}

impl FromStr for TaskLocation {
    type Err = TaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_task_id(s)
    }
}

/// Split a task id on `_` and read the week and day numbers from the first
/// two segments. Anything after the second `_` is the suffix and is ignored.
pub fn parse_task_id(task_id: &str) -> Result<TaskLocation, TaskIdError> {
    let mut segments = task_id.split('_');
    let week_segment = segments.next().unwrap_or_default();
    let day_segment = segments
        .next()
        .ok_or_else(|| TaskIdError::MissingDay(task_id.to_owned()))?;

    let week = numbered(week_segment, "week").ok_or_else(|| TaskIdError::BadWeek {
        id: task_id.to_owned(),
        segment: week_segment.to_owned(),
    })?;
    let day = numbered(day_segment, "day").ok_or_else(|| TaskIdError::BadDay {
        id: task_id.to_owned(),
        segment: day_segment.to_owned(),
    })?;

    Ok(TaskLocation { week, day })
}

fn numbered(segment: &str, prefix: &str) -> Option<i64> {
    segment.strip_prefix(prefix)?.parse().ok()
}
