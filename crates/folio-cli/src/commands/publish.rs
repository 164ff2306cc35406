//! Publish and unpublish commands
//!
//! Usage:
//!   folio publish <PATH> --tree <FILE>
//!   folio unpublish <PATH>

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use folio_core::PageTree;
use folio_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::AppContext;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Path of an existing page
    pub path: String,

    /// JSON file holding the content tree to publish
    #[arg(long)]
    pub tree: PathBuf,
}

#[derive(Debug, Args)]
pub struct UnpublishArgs {
    pub path: String,
}

pub fn execute_publish(args: PublishArgs, app: &AppContext) -> Result<()> {
    let source = std::fs::read_to_string(&args.tree)
        .with_context(|| format!("failed to read {}", args.tree.display()))?;
    let tree = PageTree::parse(&source)
        .ok_or_else(|| anyhow!("{} does not hold a content tree", args.tree.display()))?;

    let site = app.site()?;
    let cmd = EngineCommand::Publish {
        path: args.path,
        tree,
    };
    report(apply_engine_command(cmd, &site, &app.request)?, "Published")
}

pub fn execute_unpublish(args: UnpublishArgs, app: &AppContext) -> Result<()> {
    let site = app.site()?;
    let cmd = EngineCommand::Unpublish { path: args.path };
    report(apply_engine_command(cmd, &site, &app.request)?, "Unpublished")
}

fn report(result: EngineCommandResult, verb: &str) -> Result<()> {
    if let EngineCommandResult::Page(report) = result {
        for warning in &report.warnings {
            eprintln!("warning: {}", warning);
        }
        println!("✓ {} {}", verb, report.document.path);
    }
    Ok(())
}
