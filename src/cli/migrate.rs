//! CLI `migrate` command: create or upgrade the index database.

use anyhow::{Context, Result};

use crate::config::PixdexConfig;
use crate::db::{self, auth, migrations, SqliteIndex};
use crate::reset::schema::SchemaRegistry;

/// Apply pending migrations and set the admin password if it has none yet.
pub fn migrate(config: &PixdexConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    let mut index = SqliteIndex::new(&conn);

    index.migrate(false, false)?;
    auth::ensure_admin_user(&conn)?;

    if let Some(password) = config.admin_password() {
        if !auth::admin_has_password(&conn)? {
            index
                .init_admin_password(password)
                .context("failed to set initial admin password")?;
            tracing::info!("initial admin password set");
        }
    }

    let version = migrations::get_schema_version(&conn)?;
    println!("Index database at {} is at schema version {version}.", db_path.display());
    Ok(())
}
