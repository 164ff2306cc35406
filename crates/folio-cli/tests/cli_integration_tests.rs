//! CLI integration tests
//!
//! Run the `folio` binary against a temp database and check what it
//! prints.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct Env {
    dir: TempDir,
    db: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("site.db");
        Self { dir, db }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_folio"))
            .current_dir(self.dir.path())
            .env_remove("FOLIO_CONFIG")
            .env_remove("FOLIO_DATABASE_PATH")
            .env("FOLIO_LOG_PROFILE", "production")
            .env("RUST_LOG", "off")
            .arg("--db")
            .arg(&self.db)
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "folio {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

const HERO_TREE: &str = r#"{"root":{},"content":[{"id":"h1","type":"Hero","props":{"title":"Welcome"}}]}"#;

#[test]
fn test_page_publish_render_delete() {
    let env = Env::new();
    let tree = env.write("tree.json", HERO_TREE);

    let out = env.ok(&["page", "put", "/about", "--title", "About Us"]);
    assert!(out.contains("Saved /about"));

    let out = env.ok(&["publish", "/about", "--tree", path_arg(&tree)]);
    assert!(out.contains("Published /about"));

    let out = env.ok(&["render", "/about"]);
    assert!(out.contains("Welcome"));

    let out = env.ok(&["page", "list"]);
    assert!(out.contains("/about\tpublished"));

    let page: serde_json::Value = serde_json::from_str(&env.ok(&["page", "get", "/about"])).unwrap();
    assert_eq!(page["title"], "About Us");
    assert_eq!(page["is_published"], true);

    env.ok(&["page", "delete", "/about"]);
    let output = env.run(&["render", "/about"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_NOT_FOUND"));
}

#[test]
fn test_put_conflict_and_legacy_body() {
    let env = Env::new();
    env.ok(&["page", "put", "/old", "--title", "Old", "--body", "<h1>Hi</h1>"]);

    let output = env.run(&["page", "put", "/old", "--title", "Again"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_PATH_CONFLICT"));

    let out = env.ok(&["render", "/old", "--preview"]);
    assert_eq!(out.trim_end(), "<h1>Hi</h1>");

    // drafts are not public
    assert!(!env.run(&["render", "/old"]).status.success());
}

#[test]
fn test_root_without_page_renders_welcome() {
    let env = Env::new();
    let out = env.ok(&["render", "/"]);
    assert!(out.contains("folio-welcome"));
}

#[test]
fn test_root_draft_is_not_hidden_behind_welcome() {
    let env = Env::new();
    env.ok(&["page", "put", "/", "--title", "Home", "--body", "<p>coming soon</p>"]);

    let public = env.run(&["render", "/"]);
    assert!(!public.status.success());
    assert!(!String::from_utf8_lossy(&public.stdout).contains("folio-welcome"));
    assert!(String::from_utf8_lossy(&public.stderr).contains("unpublished draft"));

    let preview = env.ok(&["render", "/", "--preview"]);
    assert!(preview.contains("<p>coming soon</p>"));
}

#[test]
fn test_menu_set_show_and_dangling_links() {
    let env = Env::new();
    env.ok(&["page", "put", "/about", "--title", "About"]);
    let items = env.write(
        "items.json",
        r#"[{"label":"About","url":"/about"},{"label":"Docs","url":"https://docs.example.com","target":"_blank"}]"#,
    );

    let out = env.ok(&["menu", "set", "main", "--items", path_arg(&items)]);
    assert!(out.contains("main now has 2 items"));

    let menu: serde_json::Value = serde_json::from_str(&env.ok(&["menu", "show", "main"])).unwrap();
    assert_eq!(menu["items"][0]["label"], "About");
    assert_eq!(menu["items"][1]["order"], 1);

    env.ok(&["page", "delete", "/about"]);
    let out = env.ok(&["menu", "show", "main", "--check-links"]);
    assert!(out.contains("About\t/about\tdangling"));
    assert!(out.contains("external"));

    assert!(!env.run(&["menu", "show", "sidebar"]).status.success());
}

#[test]
fn test_blocks_list_and_schema() {
    let env = Env::new();
    let out = env.ok(&["blocks", "list"]);
    assert!(out.contains("Layout: Hero"));
    assert!(out.contains("Typography: Heading, Text"));

    let split = env.ok(&["blocks", "schema", "Hero", "--props", r#"{"variant":"split"}"#]);
    assert!(split.contains("image_side"));
    let centered = env.ok(&["blocks", "schema", "Hero"]);
    assert!(!centered.contains("image_side"));

    assert!(!env.run(&["blocks", "schema", "Marquee"]).status.success());
    // catalog queries never create a database
    assert!(!env.db.exists());
}

#[test]
fn test_blocks_check_reports_tree_problems() {
    let env = Env::new();
    let odd = env.write(
        "odd.json",
        r#"{"root":{},"content":[
            {"id":"t","type":"Text","props":{},"children":[{"id":"u","type":"Text","props":{}}]},
            {"id":"k","type":"Carousel","props":{}}
        ]}"#,
    );
    let out = env.ok(&["blocks", "check", "--tree", path_arg(&odd)]);
    assert!(out.contains("Carousel"));
    assert!(out.contains("misplaced_children"));

    let dup = env.write(
        "dup.json",
        r#"{"root":{},"content":[{"id":"a","type":"Text","props":{}},{"id":"a","type":"Text","props":{}}]}"#,
    );
    let failed = env.run(&["blocks", "check", "--tree", path_arg(&dup)]);
    assert!(!failed.status.success());
    assert!(String::from_utf8_lossy(&failed.stdout).contains("\"a\""));
    assert!(!env.db.exists());
}

#[test]
fn test_repair_dry_run_on_clean_site() {
    let env = Env::new();
    env.ok(&["page", "put", "/a", "--title", "A", "--body", HERO_TREE]);
    let out = env.ok(&["repair", "--dry-run"]);
    assert!(out.contains("Scanned 1 pages"));
    assert!(out.contains("would reassign 0 ids"));
}
