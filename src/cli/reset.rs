//! CLI `reset` command: reset the index, clear the cache, remove sidecar files.

use anyhow::Result;

use crate::config::PixdexConfig;
use crate::db::{self, SqliteIndex};
use crate::reset::{prompt::TerminalPrompter, ResetRequest, ResetTargets, Resetter};

/// Run an interactive reset of the library described by `config`.
pub fn reset(config: &PixdexConfig, request: ResetRequest) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    let targets = ResetTargets::from_config(config);

    let report =
        Resetter::new(request, &targets, TerminalPrompter, SqliteIndex::new(&conn)).run()?;

    let failed = report.total_failed();
    if failed > 0 {
        tracing::warn!(failed, "some files could not be removed");
    }
    Ok(())
}
