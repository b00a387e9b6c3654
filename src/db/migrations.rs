//! Forward-only schema migration framework.
//!
//! Tracks the schema version in `schema_meta` and runs sequential migrations
//! to bring the database up to [`CURRENT_SCHEMA_VERSION`].

use rusqlite::Connection;

/// The schema version that the current binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Tables created by migrations rather than by [`super::schema::ENTITIES`],
/// children first so they can be dropped in this order.
pub const MIGRATED_TABLES: &[&str] = &["photos_keywords", "keywords"];

/// Get the current schema version from the database.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().unwrap_or(0))
        },
    )
}

/// Update the stored schema version.
fn update_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
        [version.to_string()],
    )?;
    Ok(())
}

/// Run any pending forward-only migrations. Each migration runs in a transaction.
///
/// With `quiet` set, per-migration progress is logged at debug level only.
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection, quiet: bool) -> rusqlite::Result<u32> {
    let mut version = get_schema_version(conn)?;
    tracing::debug!(schema_version = version, target = CURRENT_SCHEMA_VERSION, "checking migrations");

    let mut applied = 0;
    while version < CURRENT_SCHEMA_VERSION {
        let next = version + 1;
        if quiet {
            tracing::debug!(from = version, to = next, "running migration");
        } else {
            tracing::info!(from = version, to = next, "running migration");
        }

        let tx = conn.unchecked_transaction()?;
        match next {
            2 => migrate_v1_to_v2(&tx)?,
            3 => migrate_v2_to_v3(&tx)?,
            _ => {
                tracing::error!(version = next, "unknown migration target");
                break;
            }
        }
        update_schema_version(&tx, next)?;
        tx.commit()?;

        version = next;
        applied += 1;
    }

    Ok(applied)
}

/// Migration v1 → v2: keyword tables for free-text photo tags.
fn migrate_v1_to_v2(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS photos_keywords (
            photo_id INTEGER NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            keyword_id INTEGER NOT NULL REFERENCES keywords(id) ON DELETE CASCADE,
            PRIMARY KEY (photo_id, keyword_id)
        );",
    )
}

/// Migration v2 → v3: track files that disappeared from the originals folder.
fn migrate_v2_to_v3(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "ALTER TABLE files ADD COLUMN file_missing INTEGER NOT NULL DEFAULT 0;
         CREATE INDEX IF NOT EXISTS idx_files_missing ON files(file_missing);",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        crate::db::schema::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn get_schema_version_returns_1_on_fresh_db() {
        let conn = test_db();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn run_migrations_upgrades_to_current() {
        let conn = test_db();
        let applied = run_migrations(&conn, false).unwrap();
        assert_eq!(applied, CURRENT_SCHEMA_VERSION - 1);
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn migration_v1_to_v2_adds_keyword_tables() {
        let conn = test_db();
        run_migrations(&conn, true).unwrap();

        for table in MIGRATED_TABLES {
            assert!(crate::db::schema::table_exists(&conn, table).unwrap());
        }
    }

    #[test]
    fn migration_v2_to_v3_adds_file_missing_column() {
        let conn = test_db();
        run_migrations(&conn, true).unwrap();

        conn.execute(
            "INSERT INTO photos (uid, created_at, updated_at) VALUES ('p1', 'now', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO files (photo_id, file_name, created_at) VALUES (1, '2024/a.jpg', 'now')",
            [],
        )
        .unwrap();
        let missing: i64 = conn
            .query_row("SELECT file_missing FROM files", [], |r| r.get(0))
            .unwrap();
        assert_eq!(missing, 0);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = test_db();
        run_migrations(&conn, true).unwrap();
        let applied = run_migrations(&conn, true).unwrap(); // second call should not error
        assert_eq!(applied, 0);
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }
}
