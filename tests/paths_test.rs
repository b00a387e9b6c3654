mod helpers;

use helpers::touch;
use pixdex::reset::paths::{enumerate, DIRECT_CHILDREN, JSON_ANY_DEPTH, YAML_ANY_DEPTH};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn json_suffix_matches_at_any_depth() {
    let tmp = TempDir::new().unwrap();
    let sidecar = tmp.path().join("sidecar");
    let deep = touch(&sidecar, "x/y/a.json");
    let top = touch(&sidecar, "b.json");
    touch(&sidecar, "c.txt");

    let matches = enumerate(&sidecar, JSON_ANY_DEPTH).unwrap();

    let mut expected = vec![deep, top];
    expected.sort();
    assert_eq!(matches, expected);
}

#[test]
fn root_metacharacters_are_literal() {
    let tmp = TempDir::new().unwrap();
    let literal = tmp.path().join("a[b]");
    let inside = touch(&literal, "1.yml");
    // Would match `a[b]` if the brackets were a character class.
    touch(&tmp.path().join("ab"), "2.yml");

    let matches = enumerate(&literal, YAML_ANY_DEPTH).unwrap();
    assert_eq!(matches, vec![inside]);
}

#[test]
fn root_star_does_not_wildcard() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("real"), "a.json");

    let matches = enumerate(&tmp.path().join("*"), JSON_ANY_DEPTH).unwrap();
    assert!(matches.is_empty());
}

#[test]
fn direct_children_include_files_and_directories() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache");
    touch(&cache, "thumbs/ab/1.jpg");
    touch(&cache, "index.tmp");
    touch(&cache, ".hidden");

    let matches = enumerate(&cache, DIRECT_CHILDREN).unwrap();
    let names: Vec<PathBuf> = matches
        .iter()
        .map(|p| p.strip_prefix(&cache).unwrap().to_path_buf())
        .collect();
    assert_eq!(names, [".hidden", "index.tmp", "thumbs"].map(PathBuf::from));
}

#[test]
fn results_are_sorted() {
    let tmp = TempDir::new().unwrap();
    for name in ["z/9.yml", "a.yml", "m/k/1.yml", "b.yml"] {
        touch(tmp.path(), name);
    }

    let matches = enumerate(tmp.path(), YAML_ANY_DEPTH).unwrap();
    let mut sorted = matches.clone();
    sorted.sort();
    assert_eq!(matches, sorted);
    assert_eq!(matches.len(), 4);
}

#[test]
fn no_matches_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "photo.jpg");
    assert!(enumerate(tmp.path(), JSON_ANY_DEPTH).unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_descended() {
    let tmp = TempDir::new().unwrap();
    let sidecar = tmp.path().join("sidecar");
    let inside = touch(&sidecar, "b.json");
    touch(&tmp.path().join("outside"), "secret.json");
    std::os::unix::fs::symlink(tmp.path().join("outside"), sidecar.join("link")).unwrap();

    let matches = enumerate(&sidecar, JSON_ANY_DEPTH).unwrap();
    assert_eq!(matches, vec![inside]);
}

#[cfg(unix)]
#[test]
fn symlink_loop_yields_each_match_once() {
    let tmp = TempDir::new().unwrap();
    let sidecar = tmp.path().join("sidecar");
    let inside = touch(&sidecar, "x/a.yml");
    std::os::unix::fs::symlink(&sidecar, sidecar.join("x/loop")).unwrap();

    let matches = enumerate(&sidecar, YAML_ANY_DEPTH).unwrap();
    assert_eq!(matches, vec![inside]);
}

#[cfg(unix)]
#[test]
fn symlink_matching_the_suffix_is_listed_itself() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache");
    touch(&tmp.path().join("outside"), "keep.jpg");
    std::fs::create_dir_all(&cache).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("outside"), cache.join("thumbs")).unwrap();

    let matches = enumerate(&cache, DIRECT_CHILDREN).unwrap();
    assert_eq!(matches, vec![cache.join("thumbs")]);
}
