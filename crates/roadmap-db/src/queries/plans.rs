//! Database query functions for the `teaching_plan` table.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use sqlx::types::Json;

use crate::models::{PlanRow, PlanSummary, Week};

/// Parameters for inserting a new plan row.
#[derive(Debug, Clone, Copy)]
pub struct NewPlan<'a> {
    pub plan_id: &'a str,
    pub title: &'a str,
    pub goal: &'a str,
    pub weeks: &'a [Week],
    pub resources: &'a Map<String, Value>,
}

/// Insert a new plan row. Returns the inserted row.
pub async fn insert_plan(pool: &SqlitePool, new: &NewPlan<'_>) -> Result<PlanRow> {
    let now = Utc::now();
    let plan = sqlx::query_as::<_, PlanRow>(
        "INSERT INTO teaching_plan (plan_id, title, goal, weeks, resources, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING *",
    )
    .bind(new.plan_id)
    .bind(new.title)
    .bind(new.goal)
    .bind(Json(new.weeks))
    .bind(Json(new.resources))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert plan {}", new.plan_id))?;

    Ok(plan)
}

/// Fetch a plan by its ID.
pub async fn get_plan(pool: &SqlitePool, plan_id: &str) -> Result<Option<PlanRow>> {
    let plan = sqlx::query_as::<_, PlanRow>("SELECT * FROM teaching_plan WHERE plan_id = ?")
        .bind(plan_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to fetch plan {plan_id}"))?;

    Ok(plan)
}

/// Whether a plan with this ID exists.
pub async fn plan_exists(pool: &SqlitePool, plan_id: &str) -> Result<bool> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM teaching_plan WHERE plan_id = ?")
        .bind(plan_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to check for plan {plan_id}"))?;

    Ok(found.is_some())
}

/// List every plan, oldest first.
pub async fn list_plans(pool: &SqlitePool) -> Result<Vec<PlanRow>> {
    let plans =
        sqlx::query_as::<_, PlanRow>("SELECT * FROM teaching_plan ORDER BY created_at, rowid")
            .fetch_all(pool)
            .await
            .context("failed to list plans")?;

    Ok(plans)
}

/// List the ID and title of every plan, oldest first.
pub async fn list_plan_summaries(pool: &SqlitePool) -> Result<Vec<PlanSummary>> {
    let plans = sqlx::query_as::<_, PlanSummary>(
        "SELECT plan_id, title FROM teaching_plan ORDER BY created_at, rowid",
    )
    .fetch_all(pool)
    .await
    .context("failed to list plan summaries")?;

    Ok(plans)
}

/// Replace the whole `weeks` document of a plan and bump `updated_at`.
pub async fn update_weeks(pool: &SqlitePool, plan_id: &str, weeks: &[Week]) -> Result<()> {
    let result = sqlx::query(
        "UPDATE teaching_plan SET weeks = ?, updated_at = ? WHERE plan_id = ?",
    )
    .bind(Json(weeks))
    .bind(Utc::now())
    .bind(plan_id)
    .execute(pool)
    .await
    .with_context(|| format!("failed to update weeks of plan {plan_id}"))?;

    if result.rows_affected() == 0 {
        anyhow::bail!("plan {plan_id} not found");
    }

    Ok(())
}

/// Delete a plan row. Returns `false` when no such plan existed.
pub async fn delete_plan(pool: &SqlitePool, plan_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM teaching_plan WHERE plan_id = ?")
        .bind(plan_id)
        .execute(pool)
        .await
        .with_context(|| format!("failed to delete plan {plan_id}"))?;

    Ok(result.rows_affected() > 0)
}
