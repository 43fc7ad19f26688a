//! One week gathered across every plan, bucketed by day of week.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use roadmap_db::models::{Comment, Feedback, Week};
use roadmap_db::queries::plans as plan_db;

use crate::document::{DAYS_PER_WEEK, normalize_day};
use crate::error::ServiceError;
use crate::service::Roadmap;

/// Tasks of a given week number from all plans, keyed by days 1 through 7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekView {
    pub week: i64,
    pub days: Vec<WeekViewDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekViewDay {
    pub day: i64,
    pub tasks: Vec<WeekViewTask>,
}

/// A task tagged with the plan it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekViewTask {
    pub task_id: String,
    pub content: String,
    pub status: String,
    pub comments: Vec<Comment>,
    pub feedbacks: Vec<Feedback>,
    pub plan_id: String,
    pub plan_title: String,
}

/// A plan's contribution to a week view: `(plan_id, plan_title, weeks)`.
pub type PlanWeeks<'a> = (&'a str, &'a str, &'a [Week]);

/// Collect every day of every `week_number` entry across `plans`.
///
/// Day numbers above seven are wrapped into 1..=7. Returns `None` when no
/// plan has a day that lands in 1..=7, even if some plan has the week.
pub fn build_week_view<'a>(
    week_number: i64,
    plans: impl IntoIterator<Item = PlanWeeks<'a>>,
) -> Option<WeekView> {
    let mut buckets: BTreeMap<i64, Vec<WeekViewTask>> = BTreeMap::new();

    for (plan_id, plan_title, weeks) in plans {
        for week in weeks.iter().filter(|w| w.week == week_number) {
            for day in &week.days {
                let bucket = buckets.entry(normalize_day(day.day)).or_default();
                bucket.extend(day.tasks.iter().map(|task| WeekViewTask {
                    task_id: task.task_id.clone(),
                    content: task.content.clone(),
                    status: task.status.clone(),
                    comments: task.comments.clone(),
                    feedbacks: task.feedbacks.clone(),
                    plan_id: plan_id.to_owned(),
                    plan_title: plan_title.to_owned(),
                }));
            }
        }
    }

    if buckets.range(1..=DAYS_PER_WEEK).next().is_none() {
        return None;
    }

    let days = (1..=DAYS_PER_WEEK)
        .map(|day| WeekViewDay {
            day,
            tasks: buckets.remove(&day).unwrap_or_default(),
        })
        .collect();

    Some(WeekView {
        week: week_number,
        days,
    })
}

impl Roadmap {
    /// The week view for `week_number` across all stored plans.
    pub async fn week_across_plans(&self, week_number: i64) -> Result<WeekView, ServiceError> {
        let plans = plan_db::list_plans(&self.pool).await?;
        let sources = plans
            .iter()
            .map(|p| (p.plan_id.as_str(), p.title.as_str(), p.weeks.0.as_slice()));

        build_week_view(week_number, sources).ok_or_else(|| {
            ServiceError::NotFound(format!("No tasks found for week {week_number}"))
        })
    }
}
