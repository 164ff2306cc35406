//! Page commands
//!
//! Usage:
//!   folio page list
//!   folio page get <PATH>
//!   folio page put <PATH> --title <TITLE> [--body <TEXT> | --body-file <FILE>] [--id <ID>] [--published]
//!   folio page delete <PATH>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use folio_core::model::PageSummary;
use folio_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult, UpsertPageRequest,
};

use super::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct PageArgs {
    #[command(subcommand)]
    pub command: PageCommand,
}

#[derive(Debug, Subcommand)]
pub enum PageCommand {
    /// List pages, most recently updated first
    List,
    /// Print a stored page as JSON
    Get {
        path: String,
    },
    /// Create a page, or update one by id
    Put(PutArgs),
    /// Delete a page (menu links to it are kept)
    Delete {
        path: String,
    },
}

#[derive(Debug, Args)]
pub struct PutArgs {
    pub path: String,

    #[arg(long)]
    pub title: String,

    /// Stored id; updates that page in place instead of creating one
    #[arg(long)]
    pub id: Option<String>,

    /// Content: a JSON tree, or markup kept as-is
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the content from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Make the page public
    #[arg(long)]
    pub published: bool,
}

pub fn execute(args: PageArgs, app: &AppContext) -> Result<()> {
    match args.command {
        PageCommand::List => list(app),
        PageCommand::Get { path } => get(app, path),
        PageCommand::Put(put_args) => put(app, put_args),
        PageCommand::Delete { path } => delete(app, path),
    }
}

fn list(app: &AppContext) -> Result<()> {
    let site = app.site()?;
    if let EngineQueryResult::Pages(pages) = apply_engine_query(EngineQuery::ListPages, &site)? {
        let summaries: Vec<PageSummary> = pages.iter().map(PageSummary::from).collect();
        for page in &summaries {
            println!(
                "{}\t{}\t{}\t{}",
                page.path,
                if page.is_published { "published" } else { "draft" },
                page.updated_at.to_rfc3339(),
                page.title
            );
        }
    }
    Ok(())
}

fn get(app: &AppContext, path: String) -> Result<()> {
    let site = app.site()?;
    match apply_engine_query(EngineQuery::PageByPath { path: path.clone() }, &site)? {
        EngineQueryResult::Page(Some(page)) => print_json(&page),
        _ => {
            eprintln!("No page at {}", path);
            Ok(())
        }
    }
}

fn put(app: &AppContext, args: PutArgs) -> Result<()> {
    let body = match (args.body, args.body_file) {
        (Some(body), _) => body,
        (None, Some(file)) => std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read {}", file.display()))?,
        (None, None) => String::new(),
    };
    let request = UpsertPageRequest {
        id: args.id,
        path: args.path,
        title: args.title,
        description: args.description,
        image_url: args.image_url,
        body,
        is_published: args.published,
    };

    let site = app.site()?;
    let result = apply_engine_command(EngineCommand::SavePage(request), &site, &app.request)?;
    if let EngineCommandResult::Page(report) = result {
        for warning in &report.warnings {
            eprintln!("warning: {}", warning);
        }
        println!(
            "✓ Saved {} ({})",
            report.document.path,
            report.document.id.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}

fn delete(app: &AppContext, path: String) -> Result<()> {
    let site = app.site()?;
    let result = apply_engine_command(EngineCommand::DeletePage { path }, &site, &app.request)?;
    if let EngineCommandResult::Deleted { path, warnings } = result {
        for warning in &warnings {
            eprintln!("warning: {}", warning);
        }
        println!("✓ Deleted {}", path);
    }
    Ok(())
}
