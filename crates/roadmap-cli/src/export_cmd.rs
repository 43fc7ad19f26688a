use std::io::Write;
use std::path::Path;

use anyhow::Context;
use sqlx::SqlitePool;

use roadmap_db::config::DbConfig;
use roadmap_db::pool;
use roadmap_db::queries::snapshot::export_snapshot;

/// Execute the `roadmap export` command.
///
/// Migrations run first, so a database file that does not exist yet exports
/// as empty tables instead of failing.
pub async fn cmd_export(db_config: &DbConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let db_pool = pool::create_pool(db_config).await?;
    let result = match pool::run_migrations(&db_pool).await {
        Ok(()) => run_export(&db_pool, output).await,
        Err(e) => Err(e),
    };
    db_pool.close().await;
    result
}

/// Export every table as a JSON object keyed by table name.
///
/// Writes to `output` when given, otherwise to stdout.
pub async fn run_export(pool: &SqlitePool, output: Option<&Path>) -> anyhow::Result<()> {
    let snapshot = export_snapshot(pool).await?;

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    serde_json::to_writer_pretty(&mut writer, &snapshot).context("failed to write snapshot")?;
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = output {
        let rows: usize = snapshot
            .as_object()
            .map(|tables| {
                tables
                    .values()
                    .filter_map(|rows| rows.as_array())
                    .map(Vec::len)
                    .sum()
            })
            .unwrap_or(0);
        tracing::info!(path = %path.display(), rows, "snapshot exported");
    }

    Ok(())
}
