use curation_core::db::migrations::latest_version;
use curation_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().expect("in-memory db");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "platforms");
    assert_table_exists(&conn, "curations");
    assert_table_exists(&conn, "curation_platforms");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("curations.db");

    let conn_first = open_db(&path).expect("first open");
    conn_first
        .execute(
            "INSERT INTO platforms (name) VALUES ('HTML5');",
            [],
        )
        .expect("insert platform");
    drop(conn_first);

    let conn_second = open_db(&path).expect("second open");
    assert_eq!(schema_version(&conn_second), latest_version());
    let platforms: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM platforms;", [], |row| row.get(0))
        .expect("count platforms");
    assert_eq!(platforms, 1);
}

#[test]
fn version_one_database_is_upgraded_in_place() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).expect("raw open");
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .expect("apply v1 schema");
    conn.execute_batch(
        "PRAGMA user_version = 1;
         INSERT INTO curations (folder, title, created_at, updated_at)
         VALUES ('legacy', 'Legacy Game', 0, 0);",
    )
    .expect("seed v1 row");
    drop(conn);

    let conn = open_db(&path).expect("upgrade open");
    assert_eq!(schema_version(&conn), latest_version());
    let (title, count): (String, i64) = conn
        .query_row(
            "SELECT title, content_file_count FROM curations WHERE folder = 'legacy';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("legacy row survives upgrade");
    assert_eq!(title, "Legacy Game");
    assert_eq!(count, 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).expect("raw open");
    conn.execute_batch("PRAGMA user_version = 999;")
        .expect("set future version");
    drop(conn);

    let err = open_db(&path).expect_err("future schema must be rejected");
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .expect("sqlite_master query");
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
