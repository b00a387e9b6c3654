#![allow(dead_code)]

use pixdex::db;
use pixdex::reset::ResetTargets;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Open a fresh in-memory database with schema, migrations and one photo.
pub fn test_db() -> Connection {
    let conn = db::open_memory_database().unwrap();
    conn.execute(
        "INSERT INTO photos (uid, title, created_at, updated_at) VALUES ('p1', 'Beach', 'now', 'now')",
        [],
    )
    .unwrap();
    conn
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, rel.as_bytes()).unwrap();
    path
}

/// A small library on disk:
///
/// ```text
/// cache/   thumbs/ab/1.jpg  thumbs/cd/2.jpg  json/meta.json  index.tmp
/// sidecar/ x/y/a.json  b.json  c.txt  x/a.yml  d.yml
/// albums/  moment/m1.yml  2024.yml
/// ```
pub fn library() -> (TempDir, ResetTargets) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    let cache = root.join("cache");
    touch(&cache, "thumbs/ab/1.jpg");
    touch(&cache, "thumbs/cd/2.jpg");
    touch(&cache, "json/meta.json");
    touch(&cache, "index.tmp");

    let sidecar = root.join("sidecar");
    touch(&sidecar, "x/y/a.json");
    touch(&sidecar, "b.json");
    touch(&sidecar, "c.txt");
    touch(&sidecar, "x/a.yml");
    touch(&sidecar, "d.yml");

    let albums = root.join("albums");
    touch(&albums, "moment/m1.yml");
    touch(&albums, "2024.yml");

    let targets = ResetTargets {
        cache,
        sidecar,
        albums,
        admin_password: Some("secret123".into()),
    };
    (tmp, targets)
}

/// Every file below `root`, relative and sorted.
pub fn files_under(root: &Path) -> Vec<String> {
    let mut found = Vec::new();
    collect(root, root, &mut found);
    found.sort();
    found
}

fn collect(base: &Path, dir: &Path, found: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(base, &path, found);
        } else {
            let rel = path.strip_prefix(base).unwrap();
            found.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
