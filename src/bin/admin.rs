//! CLI administration tool for link-shorter.
//!
//! Works directly against the database, through the same service the HTTP
//! API uses.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (reuses the existing link if the URL is known)
//! cargo run --bin admin -- link create https://example.com --len 6
//!
//! # Show a link without counting a click
//! cargo run --bin admin -- link show AbCdEf
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
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `KEY_ALPHABET` (optional): must match the server's alphabet

use link_shorter::application::services::LinkService;
use link_shorter::config::{Config, mask_connection_string};
use link_shorter::domain::entities::Link;
use link_shorter::infrastructure::persistence::PgLinkRepository;
use link_shorter::utils::key_codec::KeyCodec;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shorter.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Shorten a URL
    Create {
        /// Original URL (at most 128 characters)
        url: String,

        /// Short key length (3-12)
        #[arg(short, long, default_value_t = 6)]
        len: usize,
    },

    /// Show a link by short key
    Show {
        /// Short key
        short_key: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await?,
    }

    Ok(())
}

/// Dispatches link commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let alphabet = Config::load_alphabet()?;

    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo, KeyCodec::new(alphabet));

    match action {
        LinkAction::Create { url, len } => {
            println!("{}", "🔗 Create Short Link".bright_blue().bold());
            println!();

            let link = service
                .create_short_link(&url, len)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

            print_link(&link);
        }
        LinkAction::Show { short_key } => {
            let link = service
                .get_link(&short_key)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            print_link(&link);
        }
    }

    Ok(())
}

fn print_link(link: &Link) {
    println!("  Short key:   {}", link.short_key.bright_yellow().bold());
    println!("  URL:         {}", link.original_url.cyan());
    println!(
        "  Clicks:      {}",
        link.click_count.to_string().bright_white().bold()
    );
    println!(
        "  Created:     {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays link and click totals and the most followed links.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Total links:  {}",
        links_count.to_string().bright_white().bold()
    );
    println!(
        "  Total clicks: {}",
        clicks_count.to_string().bright_white().bold()
    );
    println!();

    let top: Vec<(String, String, i64)> = sqlx::query_as(
        "SELECT short_key, original_url, click_count FROM links ORDER BY click_count DESC, id LIMIT 5",
    )
    .fetch_all(pool)
    .await?;

    if top.is_empty() {
        println!("{}", "  No links yet".yellow());
        return Ok(());
    }

    println!(
        "  {:<13} {:<8} {}",
        "Key".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for (short_key, original_url, click_count) in &top {
        println!(
            "  {:<13} {:<8} {}",
            short_key.cyan(),
            click_count.to_string(),
            original_url.bright_black()
        );
    }
    println!();

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").execute(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  {}", mask_connection_string(database_url).bright_black());
        }
    }

    Ok(())
}
