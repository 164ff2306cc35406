use std::path::PathBuf;

use folio_core::{ContentNode, PageDocument, PageTree, Props};
use folio_store::SqliteStore;
use serde_json::Value;
use tempfile::TempDir;

/// Migrated store on a file inside a temp dir; keep the dir alive
#[allow(dead_code)]
pub fn file_store() -> (TempDir, PathBuf, SqliteStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("site.db");
    let store = SqliteStore::open(&path).expect("open store");
    (dir, path, store)
}

#[allow(dead_code)]
pub fn memory_store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("in-memory store")
}

#[allow(dead_code)]
pub fn props(value: Value) -> Props {
    value.as_object().cloned().unwrap_or_default()
}

/// Draft with a single Hero node
#[allow(dead_code)]
pub fn hero_page(path: &str, title: &str, hero_title: &str) -> PageDocument {
    PageDocument::new(path, title).with_tree(PageTree::with_content(vec![ContentNode::new(
        "h1",
        "Hero",
        props(serde_json::json!({ "title": hero_title })),
    )]))
}
