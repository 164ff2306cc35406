use folio_store::db;
use folio_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(
        table_names(&conn),
        vec!["menu_items", "menus", "pages", "schema_version"]
    );
}

#[test]
fn test_checksums_recorded() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    let checksums: Vec<String> = {
        let mut stmt = conn
            .prepare("SELECT checksum FROM schema_version ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    };
    assert_eq!(checksums.len(), 2);
    assert!(checksums.iter().all(|c| c.len() == 64));
}

#[test]
fn test_open_and_migrate_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("site.db");
    let conn = db::open_and_migrate(&path).unwrap();
    assert!(path.exists());
    assert_eq!(applied_migrations(&conn).unwrap(), vec!["001_pages", "002_menus"]);

    let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0)).unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn test_menu_items_cascade_with_menu() {
    let conn = db::open_in_memory_migrated().unwrap();
    conn.execute("INSERT INTO menus (id, slug, name) VALUES ('m', 'main', 'Main')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO menu_items (id, menu_id, label, url, position) VALUES ('i', 'm', 'Home', '/', 0)",
        [],
    )
    .unwrap();
    conn.execute("DELETE FROM menus WHERE id = 'm'", []).unwrap();
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM menu_items", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
}
