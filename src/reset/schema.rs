//! Drop and recreate the index schema.

use anyhow::Result;
use std::time::Instant;

use super::StageResult;

/// Schema operations the reset needs from the index database.
pub trait SchemaRegistry {
    /// Drop every known table. Returns how many were dropped.
    fn drop_all(&mut self) -> Result<usize>;
    /// Bring the schema to the latest version. `force` re-applies it even if
    /// already current; `quiet` keeps progress out of the info log.
    fn migrate(&mut self, force: bool, quiet: bool) -> Result<()>;
    fn init_admin_password(&mut self, password: &str) -> Result<()>;
}

impl<S: SchemaRegistry + ?Sized> SchemaRegistry for &mut S {
    fn drop_all(&mut self) -> Result<usize> {
        (**self).drop_all()
    }

    fn migrate(&mut self, force: bool, quiet: bool) -> Result<()> {
        (**self).migrate(force, quiet)
    }

    fn init_admin_password(&mut self, password: &str) -> Result<()> {
        (**self).init_admin_password(password)
    }
}

/// Drop all tables, migrate a fresh schema and restore the admin password.
///
/// Any failure is returned immediately; a half-migrated index is not safe to
/// keep working on.
pub fn reset_schema<S: SchemaRegistry + ?Sized>(
    registry: &mut S,
    admin_password: Option<&str>,
) -> Result<StageResult> {
    let start = Instant::now();

    tracing::info!("dropping existing tables");
    let dropped = registry.drop_all()?;

    tracing::info!("restoring default schema");
    registry.migrate(true, false)?;

    if let Some(password) = admin_password.filter(|p| !p.is_empty()) {
        tracing::info!("restoring initial admin password");
        registry.init_admin_password(password)?;
    }

    let result = StageResult {
        attempted: dropped,
        failed: 0,
        elapsed: start.elapsed(),
    };
    tracing::info!(tables = dropped, "database reset completed in {:?}", result.elapsed);
    Ok(result)
}
