//! SQLite platform catalog.

use crate::host::{HostResult, PlatformCatalog};
use crate::model::curation::Platform;
use rusqlite::{params, Connection, OptionalExtension};

/// Platform catalog backed by the `platforms` table.
pub struct SqlitePlatformCatalog<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlatformCatalog<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the platform named `name`, inserting it when missing.
    pub fn ensure_platform(&self, name: &str) -> HostResult<Platform> {
        self.conn.execute(
            "INSERT OR IGNORE INTO platforms (name) VALUES (?1);",
            params![name],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM platforms WHERE name = ?1;",
            params![name],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(Platform::new(id, name))
    }
}

impl PlatformCatalog for SqlitePlatformCatalog<'_> {
    fn find_platform_by_name(&self, name: &str) -> HostResult<Option<Platform>> {
        let platform = self
            .conn
            .query_row(
                "SELECT id, name FROM platforms WHERE name = ?1;",
                params![name],
                |row| Ok(Platform::new(row.get(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(platform)
    }
}
