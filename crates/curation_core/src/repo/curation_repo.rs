//! SQLite curation store.
//!
//! # Responsibility
//! - Persist curation game metadata and ordered platform tags.
//! - Map curation folders onto directories under one root.
//!
//! # Invariants
//! - `has_platforms = 0` round-trips as `platforms = None`.
//! - Platform order is preserved through `curation_platforms.position`.
//! - Writes to unknown folders return `HostError::NotFound`.

use crate::host::{CurationStore, HostError, HostResult};
use crate::model::curation::{CurationGame, CurationMetaPatch, CurationState, Platform};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use uuid::Uuid;
use walkdir::WalkDir;

const CURATION_SELECT_SQL: &str = "SELECT
    folder,
    game_id,
    title,
    application_path,
    launch_command,
    status,
    notes,
    has_platforms
FROM curations";

/// Curation store persisting metadata in SQLite and content on disk.
pub struct SqliteCurationStore<'conn> {
    conn: &'conn Connection,
    root: PathBuf,
}

impl<'conn> SqliteCurationStore<'conn> {
    /// Creates a store whose curation folders live under `root`.
    pub fn new(conn: &'conn Connection, root: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            root: root.into(),
        }
    }

    /// Inserts a curation snapshot, then creates its directory.
    pub fn insert_curation(&self, curation: &CurationState) -> HostResult<()> {
        let game = &curation.game;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO curations (
                folder,
                game_id,
                title,
                application_path,
                launch_command,
                status,
                notes,
                has_platforms,
                created_at,
                updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                (strftime('%s', 'now') * 1000),
                (strftime('%s', 'now') * 1000)
            );",
            params![
                curation.folder.as_str(),
                curation.game_id.as_deref(),
                game.title.as_deref(),
                game.application_path.as_deref(),
                game.launch_command.as_deref(),
                game.status.as_deref(),
                game.notes.as_deref(),
                i64::from(game.platforms.is_some()),
            ],
        )?;
        if let Some(platforms) = &game.platforms {
            replace_platforms(&tx, &curation.folder, platforms)?;
        }
        tx.commit()?;

        std::fs::create_dir_all(self.curation_path(&curation.folder))?;
        Ok(())
    }

    /// Returns the file count recorded by the last `refresh_content`.
    pub fn content_file_count(&self, folder: &str) -> HostResult<Option<i64>> {
        let count = self
            .conn
            .query_row(
                "SELECT content_file_count FROM curations WHERE folder = ?1;",
                params![folder],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count)
    }

    fn find_by_game_id(&self, game_id: &str) -> HostResult<Option<CurationState>> {
        let folder = self
            .conn
            .query_row(
                "SELECT folder FROM curations WHERE game_id = ?1 ORDER BY created_at ASC LIMIT 1;",
                params![game_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        match folder {
            Some(folder) => self.get_curation(&folder),
            None => Ok(None),
        }
    }

    fn load_platforms(&self, folder: &str) -> HostResult<Vec<Platform>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name
             FROM curation_platforms cp
             JOIN platforms p ON p.id = cp.platform_id
             WHERE cp.folder = ?1
             ORDER BY cp.position ASC;",
        )?;
        let rows = stmt.query_map(params![folder], |row| {
            Ok(Platform::new(row.get(0)?, row.get::<_, String>(1)?))
        })?;
        let mut platforms = Vec::new();
        for platform in rows {
            platforms.push(platform?);
        }
        Ok(platforms)
    }
}

impl CurationStore for SqliteCurationStore<'_> {
    fn get_curation(&self, folder: &str) -> HostResult<Option<CurationState>> {
        let row = self
            .conn
            .query_row(
                &format!("{CURATION_SELECT_SQL} WHERE folder = ?1;"),
                params![folder],
                parse_curation_row,
            )
            .optional()?;

        let Some((mut curation, has_platforms)) = row else {
            return Ok(None);
        };
        if has_platforms {
            curation.game.platforms = Some(self.load_platforms(folder)?);
        }
        Ok(Some(curation))
    }

    fn set_curation_game_meta(&self, folder: &str, patch: &CurationMetaPatch) -> HostResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE curations
             SET
                application_path = COALESCE(?1, application_path),
                has_platforms = CASE WHEN ?2 = 1 THEN 1 ELSE has_platforms END,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE folder = ?3;",
            params![
                patch.application_path.as_deref(),
                i64::from(patch.platforms.is_some()),
                folder,
            ],
        )?;
        if changed == 0 {
            return Err(HostError::NotFound(format!("curation `{folder}`")));
        }

        if let Some(platforms) = &patch.platforms {
            replace_platforms(&tx, folder, platforms)?;
        }
        tx.commit()?;
        debug!("event=curation_patch module=local_store status=ok folder={folder}");
        Ok(())
    }

    fn curation_path(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    fn new_curation_from_game(
        &self,
        game_id: &str,
        reuse_existing: bool,
    ) -> HostResult<CurationState> {
        if reuse_existing {
            if let Some(existing) = self.find_by_game_id(game_id)? {
                debug!(
                    "event=curation_create module=local_store status=reused folder={} game_id={game_id}",
                    existing.folder
                );
                return Ok(existing);
            }
        }

        let mut curation = CurationState::new(Uuid::new_v4().to_string());
        curation.game_id = Some(game_id.to_string());
        self.insert_curation(&curation)?;
        info!(
            "event=curation_create module=local_store status=ok folder={} game_id={game_id}",
            curation.folder
        );
        Ok(curation)
    }

    fn refresh_content(&self, folder: &str) -> HostResult<()> {
        let content = self.curation_path(folder).join("content");
        let mut count: i64 = 0;
        if content.is_dir() {
            for entry in WalkDir::new(&content).min_depth(1) {
                if entry?.file_type().is_file() {
                    count += 1;
                }
            }
        }

        let changed = self.conn.execute(
            "UPDATE curations
             SET
                content_file_count = ?1,
                content_refreshed_at = (strftime('%s', 'now') * 1000)
             WHERE folder = ?2;",
            params![count, folder],
        )?;
        if changed == 0 {
            return Err(HostError::NotFound(format!("curation `{folder}`")));
        }
        debug!("event=curation_refresh module=local_store status=ok folder={folder} files={count}");
        Ok(())
    }
}

/// Rewrites the ordered platform list of `folder`; callers own the transaction.
fn replace_platforms(conn: &Connection, folder: &str, platforms: &[Platform]) -> HostResult<()> {
    conn.execute(
        "DELETE FROM curation_platforms WHERE folder = ?1;",
        params![folder],
    )?;
    for (position, platform) in platforms.iter().enumerate() {
        conn.execute(
            "INSERT INTO curation_platforms (folder, position, platform_id)
             VALUES (?1, ?2, ?3);",
            params![folder, position as i64, platform.id],
        )?;
    }
    Ok(())
}

fn parse_curation_row(row: &Row<'_>) -> rusqlite::Result<(CurationState, bool)> {
    let curation = CurationState {
        folder: row.get("folder")?,
        game_id: row.get("game_id")?,
        game: CurationGame {
            title: row.get("title")?,
            application_path: row.get("application_path")?,
            platforms: None,
            launch_command: row.get("launch_command")?,
            status: row.get("status")?,
            notes: row.get("notes")?,
        },
    };
    let has_platforms = row.get::<_, i64>("has_platforms")? == 1;
    Ok((curation, has_platforms))
}
