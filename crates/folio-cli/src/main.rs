//! Folio CLI
//!
//! Command-line interface for composing, publishing and rendering pages

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_core::logging_facility;

mod commands;
mod config;

use commands::AppContext;
use config::FolioConfig;

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Folio - page composition and publishing", long_about = None)]
struct Cli {
    /// Database file (overrides configuration and environment)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Page operations
    Page(commands::page::PageArgs),
    /// Publish a content tree to an existing page
    Publish(commands::publish::PublishArgs),
    /// Return a published page to draft
    Unpublish(commands::publish::UnpublishArgs),
    /// Render a page to HTML
    Render(commands::render::RenderArgs),
    /// Menu operations
    Menu(commands::menu::MenuArgs),
    /// Block catalog and field schemas
    Blocks(commands::blocks::BlocksArgs),
    /// Reassign duplicate and missing node ids in stored pages
    Repair(commands::repair::RepairArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = FolioConfig::load(Path::new(".")).context("failed to load configuration")?;
    logging_facility::init(config.profile()?);
    tracing::debug!(db = %cli.db.as_deref().unwrap_or(config.database_path.as_path()).display(), "starting");

    let app = AppContext::new(config, cli.db);
    match cli.command {
        Commands::Page(args) => commands::page::execute(args, &app),
        Commands::Publish(args) => commands::publish::execute_publish(args, &app),
        Commands::Unpublish(args) => commands::publish::execute_unpublish(args, &app),
        Commands::Render(args) => commands::render::execute(args, &app),
        Commands::Menu(args) => commands::menu::execute(args, &app),
        Commands::Blocks(args) => commands::blocks::execute(args, &app),
        Commands::Repair(args) => commands::repair::execute(args, &app),
    }
}
