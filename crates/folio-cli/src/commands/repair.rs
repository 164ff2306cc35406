//! Repair command
//!
//! Usage: folio repair [--dry-run]

use anyhow::Result;
use clap::Args;
use folio_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::AppContext;

#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: RepairArgs, app: &AppContext) -> Result<()> {
    let site = app.site()?;
    let cmd = EngineCommand::RepairPages {
        dry_run: args.dry_run,
    };
    if let EngineCommandResult::Repair(summary) = apply_engine_command(cmd, &site, &app.request)? {
        for page in &summary.repaired {
            println!("{}\t{} node ids reassigned", page.path, page.reassigned.len());
        }
        let verb = if summary.dry_run { "would reassign" } else { "reassigned" };
        println!(
            "✓ Scanned {} pages, {} {} ids in {} pages",
            summary.scanned,
            verb,
            summary.total_reassigned(),
            summary.repaired.len()
        );
    }
    Ok(())
}
