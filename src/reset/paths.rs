//! Resolve a configured root plus a glob suffix into concrete paths.
//!
//! The root is walked as a literal path, so a directory named `a[b]` or `*`
//! matches only itself; only the suffix is a pattern, matched against each
//! entry's path relative to the root. `**` in the suffix matches zero or more
//! nested directories. Symlinks are listed but never descended into, so every
//! match lies inside the root and appears once.

use glob::{MatchOptions, Pattern};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Any `*.json` file at any depth.
pub const JSON_ANY_DEPTH: &str = "**/*.json";
/// Any `*.yml` file at any depth.
pub const YAML_ANY_DEPTH: &str = "**/*.yml";
/// Every direct child, files and directories alike.
pub const DIRECT_CHILDREN: &str = "*";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    #[error("root path is empty")]
    EmptyRoot,
    #[error("refusing to enumerate filesystem root {}", .0.display())]
    FilesystemRoot(PathBuf),
    #[error("invalid pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// List every entry under `root` matching `suffix`, sorted.
///
/// A missing root or no matches yields an empty list. Entries that cannot be
/// read are logged and left out; the rest of the walk continues.
pub fn enumerate(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, EnumerationError> {
    check_root(root)?;
    let pattern = Pattern::new(suffix).map_err(|source| EnumerationError::Pattern {
        pattern: suffix.to_string(),
        source,
    })?;

    if std::fs::symlink_metadata(root).is_err() {
        tracing::trace!(root = %root.display(), "root does not exist");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
    if let Some(depth) = max_depth(suffix) {
        walker = walker.max_depth(depth);
    }
    let entries = walker.into_iter().map(|entry| entry.map(walkdir::DirEntry::into_path));

    let matches = collect_matches(root, &pattern, entries);
    tracing::trace!(root = %root.display(), suffix, count = matches.len(), "enumerated paths");
    Ok(matches)
}

fn check_root(root: &Path) -> Result<(), EnumerationError> {
    if root.as_os_str().is_empty() {
        return Err(EnumerationError::EmptyRoot);
    }
    let resolved = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    if resolved.parent().is_none() {
        return Err(EnumerationError::FilesystemRoot(root.to_path_buf()));
    }
    Ok(())
}

/// Deepest level a suffix without `**` can reach.
fn max_depth(suffix: &str) -> Option<usize> {
    (!suffix.contains("**")).then(|| suffix.split('/').count())
}

/// Keep walked paths whose root-relative form matches `pattern`.
fn collect_matches<E: fmt::Display>(
    root: &Path,
    pattern: &Pattern,
    entries: impl IntoIterator<Item = Result<PathBuf, E>>,
) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if pattern.matches_path_with(relative, MATCH_OPTIONS) {
            matches.push(path);
        }
    }
    matches.sort();
    matches.dedup();
    matches
}
