pub mod auth;
pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::reset::schema::SchemaRegistry;

/// Open (or create) the index database at the given path with the schema
/// initialized and all migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn, true).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn, true).context("failed to run migrations")?;
    Ok(conn)
}

/// [`SchemaRegistry`] over a live SQLite connection.
pub struct SqliteIndex<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteIndex<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SchemaRegistry for SqliteIndex<'_> {
    fn drop_all(&mut self) -> Result<usize> {
        schema::drop_all(self.conn).context("failed to drop tables")
    }

    fn migrate(&mut self, force: bool, quiet: bool) -> Result<()> {
        let up_to_date = schema::table_exists(self.conn, "schema_meta")?
            && migrations::get_schema_version(self.conn)? >= migrations::CURRENT_SCHEMA_VERSION;
        if up_to_date && !force {
            tracing::debug!("schema is up to date");
            return Ok(());
        }

        schema::init_schema(self.conn).context("failed to initialize schema")?;
        let applied =
            migrations::run_migrations(self.conn, quiet).context("failed to run migrations")?;
        auth::ensure_admin_user(self.conn)?;

        if !quiet {
            tracing::info!(applied, version = migrations::CURRENT_SCHEMA_VERSION, "schema migrated");
        }
        Ok(())
    }

    fn init_admin_password(&mut self, password: &str) -> Result<()> {
        auth::init_admin_password(self.conn, password)
    }
}
