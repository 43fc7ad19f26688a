//! Whole-database JSON snapshot.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::{history, plans};

/// Dump every table as `{table_name: [row, ...]}`.
///
/// JSON columns are embedded as JSON values rather than strings.
pub async fn export_snapshot(pool: &SqlitePool) -> Result<Value> {
    let plans = plans::list_plans(pool).await?;
    let operations = history::list_operations(pool, None).await?;

    let mut tables = Map::new();
    tables.insert(
        "teaching_plan".to_owned(),
        serde_json::to_value(&plans).context("failed to serialize plans")?,
    );
    tables.insert(
        "operation_history".to_owned(),
        serde_json::to_value(&operations).context("failed to serialize operation history")?,
    );

    Ok(Value::Object(tables))
}
