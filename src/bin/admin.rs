//! CLI administration tool for linkforge.
//!
//! Manages links directly against the PostgreSQL store, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List active links
//! cargo run --bin admin -- link list --page 2
//!
//! # Show a link by id or short code
//! cargo run --bin admin -- link show promo
//!
//! # Create a link
//! cargo run --bin admin -- link create https://example.com --alias promo
//!
//! # Deactivate / reactivate / delete
//! cargo run --bin admin -- link deactivate 42
//! cargo run --bin admin -- link activate 42
//! cargo run --bin admin -- link delete 42
//!
//! # Check whether an alias can be used
//! cargo run --bin admin -- alias check promo
//!
//! # Link statistics and database diagnostics
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `DATABASE_URL` (or the `DB_*` components) is required.

use linkforge::application::services::{LinkService, LinkUpdate};
use linkforge::config::{self, StorageBackend};
use linkforge::AppError;
use linkforge::domain::entities::Link;
use linkforge::infrastructure::persistence::PgLinkRepository;
use linkforge::server::connect_database;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type Service = LinkService<PgLinkRepository>;

/// CLI tool for managing linkforge.
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
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Custom alias tools
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List active links, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short = 's', long, default_value_t = 25)]
        page_size: u32,
    },

    /// Show a link by numeric id or short code
    Show { id_or_code: String },

    /// Create a link
    Create {
        url: String,

        /// Custom alias instead of a random code
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Stop resolving a link (410 Gone)
    Deactivate { id: i64 },

    /// Resume resolving a link
    Activate { id: i64 },

    /// Delete a link and free its code
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AliasAction {
    /// Check whether an alias is well-formed and unused
    Check { alias: String },
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

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin requires STORAGE_BACKEND=postgres");
    }

    let pool = connect_database(&config).await?;
    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repository, config.allocation_settings());

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &service, &config.base_url).await?,
        Commands::Alias { action } => handle_alias_action(action, &service).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, service: &Service, base_url: &str) -> Result<()> {
    match action {
        LinkAction::List { page, page_size } => list_links(service, page, page_size).await,
        LinkAction::Show { id_or_code } => {
            let link = find_link(service, &id_or_code).await?;
            print_link(&link, base_url);
            Ok(())
        }
        LinkAction::Create { url, alias } => {
            let link = service
                .create_link(url, alias)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

            println!("{}", "✅ Link created".green().bold());
            println!();
            print_link(&link, base_url);
            Ok(())
        }
        LinkAction::Deactivate { id } => set_active(service, id, false).await,
        LinkAction::Activate { id } => set_active(service, id, true).await,
        LinkAction::Delete { id, yes } => delete_link(service, id, yes, base_url).await,
    }
}

async fn list_links(service: &Service, page: u32, page_size: u32) -> Result<()> {
    println!("{}", "📋 Active links".bright_blue().bold());
    println!();

    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);
    let offset = i64::from(page - 1) * i64::from(page_size);

    let result = service
        .list_links(offset, i64::from(page_size))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if result.items.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<14} {:<8} {:<17} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for link in &result.items {
        println!(
            "  {:<6} {:<14} {:<8} {:<17} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.click_count,
            link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Page {} · showing {} of {}",
        page,
        result.items.len(),
        result.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Looks up by id when the argument is numeric, falling back to short code
/// (codes may be all digits).
async fn find_link(service: &Service, id_or_code: &str) -> Result<Link> {
    let link = match id_or_code.parse::<i64>() {
        Ok(id) => match service.get_link(id).await {
            Err(AppError::NotFound { .. }) => service.get_link_by_code(id_or_code).await,
            other => other,
        },
        Err(_) => service.get_link_by_code(id_or_code).await,
    };

    link.map_err(|e| anyhow::anyhow!("{}", e))
}

fn print_link(link: &Link, base_url: &str) {
    let status = if link.is_active {
        "ACTIVE".green()
    } else {
        "INACTIVE".red()
    };

    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Short URL: {}/{}", base_url, link.short_code.cyan());
    println!("  Target:    {}", link.original_url);
    if let Some(alias) = &link.custom_alias {
        println!("  Alias:     {}", alias.cyan());
    }
    println!("  Clicks:    {}", link.click_count.to_string().bright_green());
    println!("  Created:   {}", link.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Status:    {}", status);
    println!();
}

async fn set_active(service: &Service, id: i64, active: bool) -> Result<()> {
    let link = service
        .update_link(
            id,
            LinkUpdate {
                is_active: Some(active),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?;

    let verb = if active { "activated" } else { "deactivated" };
    println!(
        "{} {} {}",
        "✅ Link".green().bold(),
        link.short_code.cyan(),
        verb.green().bold()
    );

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &Service, id: i64, yes: bool, base_url: &str) -> Result<()> {
    println!("{}", "🗑  Delete link".bright_blue().bold());
    println!();

    let link = service
        .get_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    print_link(&link, base_url);

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link? Its code becomes available again.")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    Ok(())
}

async fn handle_alias_action(action: AliasAction, service: &Service) -> Result<()> {
    match action {
        AliasAction::Check { alias } => {
            let available = service
                .check_alias_available(&alias)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to check alias: {}", e))?;

            if available {
                println!("  {} is {}", alias.cyan(), "available".green().bold());
            } else {
                println!("  {} is {}", alias.cyan(), "not available".red().bold());
            }
        }
    }

    Ok(())
}

/// Displays link totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (total, active, aliased, clicks): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE is_active),
            COUNT(custom_alias),
            COALESCE(SUM(click_count), 0)::BIGINT
        FROM links
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to query statistics")?;

    println!("  Links:          {}", total.to_string().bright_green().bold());
    println!("  Active links:   {}", active.to_string().bright_green().bold());
    println!("  Custom aliases: {}", aliased.to_string().bright_green().bold());
    println!("  Clicks:         {}", clicks.to_string().bright_green().bold());
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
