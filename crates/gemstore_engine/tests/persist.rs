use std::fs;

use gemstore_engine::{
    ensure_dir, write_atomic, FileStateStore, FileWatchListSource, StateStore, WatchListSource,
};
use tempfile::TempDir;

#[test]
fn creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("last_updated.txt");

    write_atomic(&target, "hello").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

    write_atomic(&target, "world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");
}

#[test]
fn no_partial_file_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("not_a_dir");
    fs::write(&not_a_dir, "x").unwrap();

    let result = write_atomic(&not_a_dir.join("state.txt"), "data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "x");
}

#[test]
fn state_store_starts_empty_and_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = FileStateStore::new(temp.path().join("last_updated.txt"));

    assert_eq!(store.load().unwrap(), None);
    store.save("2023-08-25T00:00:00Z").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("2023-08-25T00:00:00Z"));
}

#[test]
fn state_store_treats_blank_file_as_no_state() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("last_updated.txt");
    fs::write(&path, "  \n").unwrap();

    assert_eq!(FileStateStore::new(path).load().unwrap(), None);
}

#[test]
fn missing_watch_list_is_empty() {
    let temp = TempDir::new().unwrap();
    let source = FileWatchListSource::new(temp.path().join("watch_list.txt"));

    assert!(source.load().unwrap().is_empty());
}

#[test]
fn watch_list_file_is_parsed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("watch_list.txt");
    fs::write(&path, "# wanted\nHat\nBoots\n\n").unwrap();

    let list = FileWatchListSource::new(path).load().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.contains("Hat"));
}

#[test]
fn unreadable_watch_list_is_an_error() {
    let temp = TempDir::new().unwrap();
    // A directory cannot be read as a file.
    let source = FileWatchListSource::new(temp.path());

    assert!(source.load().is_err());
}
