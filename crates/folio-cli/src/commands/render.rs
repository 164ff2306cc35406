//! Render command
//!
//! Usage: folio render <PATH> [--preview] [--output <FILE>]

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use folio_core::errors::ExErrorKind;
use folio_engine::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::AppContext;

/// Served for the site root before any page exists there
const WELCOME_HTML: &str = "<div class=\"folio-page folio-welcome\"><h1>Welcome</h1><p>This site has no home page yet.</p></div>";

#[derive(Debug, Args)]
pub struct RenderArgs {
    pub path: String,

    /// Render the current draft instead of the public page
    #[arg(long)]
    pub preview: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: RenderArgs, app: &AppContext) -> Result<()> {
    let site = app.site()?;
    let query = if args.preview {
        EngineQuery::RenderPreview {
            path: args.path.clone(),
        }
    } else {
        EngineQuery::RenderPublic {
            path: args.path.clone(),
        }
    };

    let html = match apply_engine_query(query, &site) {
        Ok(EngineQueryResult::Rendered(output)) => {
            for warning in &output.warnings {
                eprintln!("warning: node {}: {}", warning.node_id, warning.message);
            }
            output.html
        }
        Ok(_) => String::new(),
        Err(e) if e.kind() == ExErrorKind::NotFound && args.path == "/" => {
            let stored = apply_engine_query(EngineQuery::PageByPath { path: args.path.clone() }, &site)?;
            match stored {
                EngineQueryResult::Page(None) => WELCOME_HTML.to_string(),
                _ => {
                    return Err(anyhow::Error::from(e)
                        .context("the home page is an unpublished draft; use --preview to see it"))
                }
            }
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, html)?;
        println!("✓ Rendered to {}", output_path.display());
    } else {
        println!("{}", html);
    }
    Ok(())
}
