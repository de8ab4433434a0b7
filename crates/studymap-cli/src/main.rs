mod chat_cmd;
mod config;
mod roadmap_cmds;
mod serve_cmd;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use studymap_core::{classify, synthesize, PlanMode};
use studymap_db::pool;

use config::StudymapConfig;

#[derive(Parser)]
#[command(name = "studymap", about = "Study roadmap engine: classify, plan, track")]
struct Cli {
    /// Database URL (overrides STUDYMAP_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a studymap config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/studymap")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the studymap database (requires config file or env vars)
    DbInit,
    /// Classify input text without touching the database
    Classify {
        /// Free text describing a study target
        text: String,
    },
    /// Synthesize a roadmap and store it
    Create {
        /// Free text describing a study target
        text: String,
        /// Plan mode: exam or placement
        #[arg(long, default_value = "exam")]
        mode: String,
    },
    /// List stored roadmaps
    List,
    /// Show a roadmap with all periods and items
    Show {
        /// Roadmap ID
        id: String,
    },
    /// Toggle one item's completion state
    Toggle {
        /// Roadmap ID
        id: String,
        /// 1-based period index
        period: u32,
        /// Item label, or a 1-based item index
        item: String,
    },
    /// Delete a roadmap
    Delete {
        /// Roadmap ID
        id: String,
    },
    /// Ask the study assistant a question (one-shot)
    Chat {
        /// Message to send
        message: String,
    },
    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8300)]
        port: u16,
    },
}

/// Execute the `studymap init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let owner_id = Uuid::new_v4();

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        owner: config::OwnerSection { id: owner_id },
        completion: None,
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  owner.id = {owner_id}");
    println!();
    println!("Next: run `studymap db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `studymap db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = StudymapConfig::resolve(cli_db_url)?;

    println!("Initializing studymap database...");

    pool::ensure_database_exists(&resolved.db_config).await?;

    let db_pool = pool::create_pool(&resolved.db_config).await?;

    pool::run_migrations(&db_pool).await?;

    let count = pool::roadmap_count(&db_pool).await?;
    println!("Database ready. {count} roadmaps stored.");

    db_pool.close().await;

    println!("studymap db-init complete.");
    Ok(())
}

/// Execute the `studymap classify` command. Purely local.
fn cmd_classify(text: &str) {
    let target = classify(text);
    let roadmap = synthesize(text, PlanMode::Exam);
    println!("  Input:    {text}");
    println!("  Category: {}", target.category);
    println!("  Name:     {}", target.name);
    println!("  Title:    {}", roadmap.title);
    println!("  Periods:  {}", roadmap.periods.len());
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
        Commands::Classify { text } => {
            cmd_classify(&text);
        }
        Commands::Create { text, mode } => {
            let mode: PlanMode = mode
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid --mode: {e}"))?;
            let resolved = StudymapConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = roadmap_cmds::cmd_create(&db_pool, resolved.owner_id, &text, mode).await;
            db_pool.close().await;
            result?;
        }
        Commands::List => {
            let resolved = StudymapConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = roadmap_cmds::cmd_list(&db_pool, resolved.owner_id).await;
            db_pool.close().await;
            result?;
        }
        Commands::Show { id } => {
            let resolved = StudymapConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = roadmap_cmds::cmd_show(&db_pool, resolved.owner_id, &id).await;
            db_pool.close().await;
            result?;
        }
        Commands::Toggle { id, period, item } => {
            let resolved = StudymapConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result =
                roadmap_cmds::cmd_toggle(&db_pool, resolved.owner_id, &id, period, &item).await;
            db_pool.close().await;
            result?;
        }
        Commands::Delete { id } => {
            let resolved = StudymapConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = roadmap_cmds::cmd_delete(&db_pool, resolved.owner_id, &id).await;
            db_pool.close().await;
            result?;
        }
        Commands::Chat { message } => {
            // Chat works without a database; config only supplies the
            // optional backend.
            let completion = StudymapConfig::resolve(cli.database_url.as_deref())
                .ok()
                .and_then(|c| c.completion);
            chat_cmd::run_chat(completion.as_ref(), &message).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = StudymapConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let chat = Arc::new(chat_cmd::build_chat_router(resolved.completion.as_ref()));
            let result = serve_cmd::run_serve(db_pool.clone(), chat, &bind, port).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
