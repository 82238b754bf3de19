//! CLI administration tool for snip.
//!
//! Works directly against the PostgreSQL store, without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (prompts when the URL is omitted)
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Show a mapping without counting a click
//! cargo run --bin admin -- lookup aB3dE9
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server (`DATABASE_URL` or `DB_*`).

use snip::application::services::LinkService;
use snip::config::{Config, StoreBackend};
use snip::domain::repositories::MappingStore;
use snip::infrastructure::persistence::{PgMappingStore, connect_pg_pool};
use snip::utils::base_url::short_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// CLI tool for managing snip.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL, or print the existing code for a known URL
    Shorten {
        /// URL to shorten (prompted for when omitted)
        url: Option<String>,

        /// Public base URL used to print the short URL
        #[arg(short, long, default_value = "http://localhost:8080")]
        base_url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a mapping and its click count
    Lookup {
        /// Short code to look up
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!("The admin tool needs STORE_BACKEND=postgres");
    }
    config.validate()?;

    let pool = connect_pg_pool(&config).await?;
    let store: Arc<dyn MappingStore> = Arc::new(PgMappingStore::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Shorten { url, base_url, yes } => {
            let service = link_service(store, &config);
            shorten(&service, url, &base_url, yes).await?;
        }
        Commands::Lookup { code } => {
            let service = link_service(store, &config);
            lookup(&service, &code).await?;
        }
        Commands::Stats => handle_stats(store.as_ref()).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Link service without a click worker.
///
/// Neither command resolves a code, so the click queue is never used.
fn link_service(store: Arc<dyn MappingStore>, config: &Config) -> LinkService {
    let (click_tx, _) = mpsc::channel(1);
    LinkService::new(store, click_tx, config.store_timeout())
}

/// Shortens a URL with interactive prompts.
async fn shorten(
    service: &LinkService,
    url: Option<String>,
    base_url: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "✂️  Shorten URL".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new().with_prompt("URL").interact_text()?,
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Shorten {url}?"))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let shortened = service
        .shorten_url(&url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    let created = shortened.is_created();
    let mapping = shortened.into_mapping();

    println!();
    if created {
        println!("{}", "✅ Mapping created".green().bold());
    } else {
        println!("{}", "ℹ️  URL was already shortened".yellow());
    }
    println!("  Original:  {}", mapping.original_url.cyan());
    println!("  Code:      {}", mapping.short_code.bright_yellow().bold());
    println!(
        "  Short URL: {}",
        short_url(base_url, &mapping.short_code).bright_white()
    );
    println!();

    Ok(())
}

/// Prints a mapping without counting a click.
async fn lookup(service: &LinkService, code: &str) -> Result<()> {
    let mapping = service
        .preview_url(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Lookup of '{code}' failed"))?;

    println!("{}", "🔎 Mapping".bright_blue().bold());
    println!();
    println!("  Code:     {}", mapping.short_code.bright_yellow().bold());
    println!("  Original: {}", mapping.original_url.cyan());
    println!(
        "  Created:  {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!(
        "  Clicks:   {}",
        mapping.click_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Displays store-wide statistics.
async fn handle_stats(store: &dyn MappingStore) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = store
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  Mappings: {}",
        summary.mappings.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:   {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
