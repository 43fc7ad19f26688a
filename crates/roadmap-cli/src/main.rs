mod config;
mod export_cmd;
mod serve_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use roadmap_core::Roadmap;
use roadmap_core::feedback::OllamaChat;
use roadmap_db::pool;

use config::RoadmapConfig;

#[derive(Parser)]
#[command(name = "roadmap", about = "Teaching-plan service with task feedback")]
struct Cli {
    /// Database URL (overrides ROADMAP_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a roadmap config file (no database required)
    Init {
        /// SQLite connection URL
        #[arg(long, default_value = "sqlite://roadmap.db")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database file and run migrations
    DbInit,
    /// Run the HTTP API
    Serve {
        /// Address to bind (defaults to the config file, then 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (defaults to the config file, then 8000)
        #[arg(long)]
        port: Option<u16>,
        /// Export the database to this JSON file before serving
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Export every table as JSON
    Export {
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Execute the `roadmap init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_owned(),
        },
        server: config::ServerSection::default(),
        feedback: config::FeedbackSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `roadmap db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `roadmap db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = RoadmapConfig::resolve(cli_db_url)?;

    println!("Initializing roadmap database...");

    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("roadmap db-init complete.");
    Ok(())
}

async fn cmd_serve(
    resolved: RoadmapConfig,
    bind: Option<String>,
    port: Option<u16>,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<()> {
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    if let Some(path) = snapshot.as_deref() {
        export_cmd::run_export(&db_pool, Some(path)).await?;
    }

    let model = OllamaChat::new(&resolved.feedback)?;
    tracing::info!(url = model.chat_url(), model = %resolved.feedback.model, "feedback model configured");
    let roadmap = Roadmap::new(db_pool.clone(), Arc::new(model));

    let bind = bind.unwrap_or(resolved.server.bind);
    let port = port.unwrap_or(resolved.server.port);
    let result = serve_cmd::run_serve(roadmap, &bind, port).await;
    db_pool.close().await;
    result
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve {
            bind,
            port,
            snapshot,
        } => {
            let resolved = RoadmapConfig::resolve(cli.database_url.as_deref())?;
            cmd_serve(resolved, bind, port, snapshot).await?;
        }
        Commands::Export { output } => {
            let resolved = RoadmapConfig::resolve(cli.database_url.as_deref())?;
            export_cmd::cmd_export(&resolved.db_config, output.as_deref()).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "roadmap", &mut std::io::stdout());
        }
    }

    Ok(())
}
