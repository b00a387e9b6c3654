//! SQL DDL for all index tables.
//!
//! [`ENTITIES`] is the registry of every table the index owns, listed in
//! dependency order: a table only references tables that appear before it.
//! Creation walks the list forwards, [`drop_all`] walks it backwards. All DDL
//! uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// A table known to the schema, with the DDL that creates it and its indexes.
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub table: &'static str,
    pub ddl: &'static str,
}

/// Every table of the index, parents before children.
pub const ENTITIES: &[Entity] = &[
    Entity {
        table: "schema_meta",
        ddl: "CREATE TABLE IF NOT EXISTS schema_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    },
    Entity {
        table: "users",
        ddl: "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_name TEXT NOT NULL UNIQUE,
            display_name TEXT,
            role TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('admin','user','guest')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    },
    Entity {
        table: "passwords",
        ddl: "CREATE TABLE IF NOT EXISTS passwords (
            user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            salt TEXT NOT NULL,
            hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    },
    Entity {
        table: "photos",
        ddl: "CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT NOT NULL UNIQUE,
            title TEXT,
            taken_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_photos_taken_at ON photos(taken_at);",
    },
    Entity {
        table: "files",
        ddl: "CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            photo_id INTEGER NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            file_name TEXT NOT NULL UNIQUE,
            file_hash TEXT,
            file_size INTEGER NOT NULL DEFAULT 0,
            sidecar INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_files_photo ON files(photo_id);",
    },
    Entity {
        table: "albums",
        ddl: "CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    },
    Entity {
        table: "photos_albums",
        ddl: "CREATE TABLE IF NOT EXISTS photos_albums (
            photo_id INTEGER NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            album_id INTEGER NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
            PRIMARY KEY (photo_id, album_id)
        );",
    },
    Entity {
        table: "labels",
        ddl: "CREATE TABLE IF NOT EXISTS labels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );",
    },
    Entity {
        table: "photos_labels",
        ddl: "CREATE TABLE IF NOT EXISTS photos_labels (
            photo_id INTEGER NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            label_id INTEGER NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
            uncertainty INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (photo_id, label_id)
        );",
    },
];

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    for entity in ENTITIES {
        conn.execute_batch(entity.ddl)?;
    }

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

/// Drop every table added by migrations, then every registered table in
/// reverse dependency order. Returns the number of tables that existed.
pub fn drop_all(conn: &Connection) -> rusqlite::Result<usize> {
    let mut dropped = 0;
    let migrated = super::migrations::MIGRATED_TABLES.iter().copied();
    for table in migrated.chain(ENTITIES.iter().rev().map(|e| e.table)) {
        if table_exists(conn, table)? {
            tracing::debug!(table, "dropping table");
            conn.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\";"))?;
            dropped += 1;
        }
    }
    Ok(dropped)
}

pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )
}
