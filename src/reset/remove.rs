//! Best-effort removal of a set of paths.
//!
//! Every path is attempted regardless of earlier failures; the outcome is an
//! accumulated [`StageResult`] rather than an error.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::StageResult;

/// Progress marker for a removed item.
pub const MARK_OK: &str = ".";
/// Progress marker for an item that could not be removed.
pub const MARK_ERR: &str = "E";

/// Filesystem deletion primitive.
pub trait Unlink {
    /// Remove `path`. With `recursive`, a directory goes with its whole
    /// subtree; without it only files and empty directories can be removed.
    fn unlink(&self, path: &Path, recursive: bool) -> io::Result<()>;
}

/// [`Unlink`] on the real filesystem.
///
/// A path that is already gone counts as removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsUnlink;

impl Unlink for FsUnlink {
    fn unlink(&self, path: &Path, recursive: bool) -> io::Result<()> {
        let result = std::fs::symlink_metadata(path).and_then(|meta| {
            match (meta.is_dir(), recursive) {
                (true, true) => std::fs::remove_dir_all(path),
                (true, false) => std::fs::remove_dir(path),
                (false, _) => std::fs::remove_file(path),
            }
        });

        match result {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Remove every path in `matches`, printing one marker per item to `progress`.
pub fn remove_all(
    matches: &[PathBuf],
    recursive: bool,
    unlink: &dyn Unlink,
    progress: &mut dyn Write,
) -> StageResult {
    let start = Instant::now();
    let mut failed = 0;

    for path in matches {
        let mark = match unlink.unlink(path, recursive) {
            Ok(()) => MARK_OK,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "remove failed");
                failed += 1;
                MARK_ERR
            }
        };
        // Write errors on the progress stream are ignored.
        let _ = progress.write_all(mark.as_bytes());
        let _ = progress.flush();
    }
    let _ = writeln!(progress);

    let result = StageResult {
        attempted: matches.len(),
        failed,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        attempted = result.attempted,
        succeeded = result.succeeded(),
        failed = result.failed,
        "removal finished [{:?}]",
        result.elapsed
    );
    result
}
