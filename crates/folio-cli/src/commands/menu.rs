//! Menu commands
//!
//! Usage:
//!   folio menu show <SLUG> [--check-links]
//!   folio menu set <SLUG> --items <FILE>
//!
//! The items file is a JSON array of `{"label", "url", "target"?}`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use folio_core::MenuItemInput;
use folio_engine::commands::menus::LinkState;
use folio_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};

use super::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct MenuArgs {
    #[command(subcommand)]
    pub command: MenuCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenuCommand {
    /// Print a menu and its items
    Show {
        slug: String,
        /// Mark items whose page no longer exists
        #[arg(long)]
        check_links: bool,
    },
    /// Replace every item of a menu
    Set {
        slug: String,
        #[arg(long)]
        items: PathBuf,
    },
}

pub fn execute(args: MenuArgs, app: &AppContext) -> Result<()> {
    match args.command {
        MenuCommand::Show { slug, check_links } => show(app, slug, check_links),
        MenuCommand::Set { slug, items } => set(app, slug, items),
    }
}

fn show(app: &AppContext, slug: String, check_links: bool) -> Result<()> {
    let site = app.site()?;
    if check_links {
        if let EngineQueryResult::MenuLinks(report) =
            apply_engine_query(EngineQuery::MenuLinks { slug }, &site)?
        {
            for link in &report.links {
                let marker = match link.state {
                    LinkState::Page => "ok",
                    LinkState::Dangling => "dangling",
                    LinkState::External => "external",
                };
                println!("{}\t{}\t{}", link.item.label, link.item.url, marker);
            }
        }
        return Ok(());
    }
    if let EngineQueryResult::Menu(menu) = apply_engine_query(EngineQuery::GetMenu { slug }, &site)? {
        print_json(&menu)?;
    }
    Ok(())
}

fn set(app: &AppContext, slug: String, items_file: PathBuf) -> Result<()> {
    let source = std::fs::read_to_string(&items_file)
        .with_context(|| format!("failed to read {}", items_file.display()))?;
    let items: Vec<MenuItemInput> = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a list of menu items", items_file.display()))?;

    let site = app.site()?;
    let result = apply_engine_command(EngineCommand::PutMenu { slug, items }, &site, &app.request)?;
    if let EngineCommandResult::Menu(menu) = result {
        println!("✓ {} now has {} items", menu.menu.slug, menu.items.len());
    }
    Ok(())
}
