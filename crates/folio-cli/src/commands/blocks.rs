//! Block catalog commands
//!
//! Usage:
//!   folio blocks list
//!   folio blocks schema <TYPE> [--props <JSON>]
//!   folio blocks check --tree <FILE>

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use folio_core::registry::resolve_fields;
use folio_core::rules::validate_tree_with;
use folio_core::{PageTree, Props};

use super::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct BlocksArgs {
    #[command(subcommand)]
    pub command: BlocksCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlocksCommand {
    /// List block types by category
    List,
    /// Print the fields currently applicable to a block instance
    Schema {
        block_type: String,
        /// Current props as a JSON object
        #[arg(long)]
        props: Option<String>,
    },
    /// Report id and block problems in a content tree file
    Check {
        #[arg(long)]
        tree: PathBuf,
    },
}

pub fn execute(args: BlocksArgs, app: &AppContext) -> Result<()> {
    let registry = app.registry()?;
    match args.command {
        BlocksCommand::List => {
            for (category, names) in registry.categories() {
                println!("{}: {}", category, names.join(", "));
            }
            Ok(())
        }
        BlocksCommand::Schema { block_type, props } => {
            let props = parse_props(props.as_deref())?;
            let fields = resolve_fields(&registry, &block_type, &props)?;
            print_json(&fields)
        }
        BlocksCommand::Check { tree } => {
            let source = std::fs::read_to_string(&tree)
                .with_context(|| format!("failed to read {}", tree.display()))?;
            let parsed = PageTree::parse(&source)
                .ok_or_else(|| anyhow!("{} does not hold a content tree", tree.display()))?;
            let report = validate_tree_with(&parsed, &registry);
            print_json(&report)?;
            if !report.is_valid() {
                bail!("tree has duplicate or missing node ids");
            }
            Ok(())
        }
    }
}

fn parse_props(source: Option<&str>) -> Result<Props> {
    let Some(source) = source else {
        return Ok(Props::new());
    };
    match serde_json::from_str::<serde_json::Value>(source).context("--props is not valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("--props must be a JSON object"),
    }
}
