//! Database query functions for the `operation_history` table.
//!
//! Rows are only ever inserted and read; nothing updates or deletes them.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::types::Json;

use crate::models::{OperationRecord, OperationType};

/// Append an operation to the history. Returns the inserted row.
pub async fn append_operation(
    pool: &SqlitePool,
    plan_id: &str,
    operation_type: OperationType,
    details: &Value,
) -> Result<OperationRecord> {
    let record = sqlx::query_as::<_, OperationRecord>(
        "INSERT INTO operation_history (plan_id, operation_type, details, timestamp) \
         VALUES (?, ?, ?, ?) \
         RETURNING *",
    )
    .bind(plan_id)
    .bind(operation_type)
    .bind(Json(details))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to record {operation_type} operation for plan {plan_id}"))?;

    Ok(record)
}

/// List recorded operations in the order they were appended.
///
/// `None` returns the history of every plan.
pub async fn list_operations(
    pool: &SqlitePool,
    plan_id: Option<&str>,
) -> Result<Vec<OperationRecord>> {
    let records = match plan_id {
        Some(plan_id) => sqlx::query_as::<_, OperationRecord>(
            "SELECT * FROM operation_history WHERE plan_id = ? ORDER BY id ASC",
        )
        .bind(plan_id)
        .fetch_all(pool)
        .await
        .with_context(|| format!("failed to list operations for plan {plan_id}"))?,
        None => sqlx::query_as::<_, OperationRecord>(
            "SELECT * FROM operation_history ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
        .context("failed to list operations")?,
    };

    Ok(records)
}
