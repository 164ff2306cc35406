//! One-time repair of stored trees
//!
//! Older documents can hold nodes that share an id or have none. Writes
//! now reject such trees, so this runs once over existing data: each
//! document gets the first-wins [`repair`] and only changed documents are
//! written back.

#![allow(clippy::result_large_err)]

use folio_core::rules::{repair, Reassignment};
use folio_core::{log_op_end, log_op_start};
use folio_core::{PageRepository, RepoResult};
use serde::Serialize;

/// Reassignments made in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRepair {
    pub path: String,
    pub reassigned: Vec<Reassignment>,
}

/// Outcome of a repair run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub dry_run: bool,
    pub scanned: usize,
    pub repaired: Vec<PageRepair>,
}

impl RepairSummary {
    pub fn total_reassigned(&self) -> usize {
        self.repaired.iter().map(|p| p.reassigned.len()).sum()
    }
}

/// Repair every stored document; with `dry_run` nothing is written
///
/// # Errors
///
/// Stops at the first repository failure. Documents written before it
/// stay repaired.
pub fn repair_all_pages(repo: &dyn PageRepository, dry_run: bool) -> RepoResult<RepairSummary> {
    log_op_start!("repair_all_pages", dry_run = dry_run);
    let start = std::time::Instant::now();

    let mut summary = RepairSummary {
        dry_run,
        ..RepairSummary::default()
    };
    for mut doc in repo.list()? {
        summary.scanned += 1;
        let Some(tree) = doc.tree.as_mut() else {
            continue;
        };
        let report = repair(tree);
        if !report.changed() {
            continue;
        }
        tracing::info!(
            op = "repair_all_pages",
            path = doc.path.as_str(),
            reassigned = report.count(),
            "reassigned node ids"
        );
        let path = doc.path.clone();
        if !dry_run {
            repo.upsert(doc)?;
        }
        summary.repaired.push(PageRepair {
            path,
            reassigned: report.reassigned,
        });
    }

    log_op_end!(
        "repair_all_pages",
        duration_ms = start.elapsed().as_millis() as u64,
        scanned = summary.scanned,
        repaired = summary.repaired.len()
    );
    Ok(summary)
}
