//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_content_refresh.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn applies_all_migrations_and_is_repeatable() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        apply_migrations(&mut conn).expect("first apply");
        apply_migrations(&mut conn).expect("second apply is a no-op");

        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .expect("user_version");
        assert_eq!(version, latest_version());

        conn.execute(
            "INSERT INTO curations (folder, created_at, updated_at) VALUES ('f', 0, 0);",
            [],
        )
        .expect("curations table should exist");
        let count: i64 = conn
            .query_row(
                "SELECT content_file_count FROM curations WHERE folder = 'f';",
                [],
                |row| row.get(0),
            )
            .expect("refresh columns should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn rejects_newer_schema_version() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch("PRAGMA user_version = 99;")
            .expect("set future version");
        let err = apply_migrations(&mut conn).expect_err("future schema must be rejected");
        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version: 99, .. }
        ));
    }
}
