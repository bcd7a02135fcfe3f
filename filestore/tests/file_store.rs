//! Integration tests for `FileKeyValueStore` against a real directory.

#![allow(clippy::unwrap_used)]

use todolist_core::storage::{KeyValueError, KeyValueStore};
use todolist_filestore::FileKeyValueStore;

#[tokio::test]
async fn test_missing_key_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    assert_eq!(store.get_item("list").await.unwrap(), None);
}

#[tokio::test]
async fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    store
        .set_item("list", r#"[{"key":"a","text":"a","complete":false}]"#.to_string())
        .await
        .unwrap();

    let value = store.get_item("list").await.unwrap();
    assert_eq!(
        value.as_deref(),
        Some(r#"[{"key":"a","text":"a","complete":false}]"#)
    );
}

#[tokio::test]
async fn test_overwrite_replaces_whole_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    store.set_item("list", "a much longer first value".to_string()).await.unwrap();
    store.set_item("list", "short".to_string()).await.unwrap();

    assert_eq!(store.get_item("list").await.unwrap().as_deref(), Some("short"));
}

#[tokio::test]
async fn test_value_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileKeyValueStore::open(dir.path()).await.unwrap();
        store.set_item("list", "[]".to_string()).await.unwrap();
    }

    let reopened = FileKeyValueStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.get_item("list").await.unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    for i in 0..5 {
        store.set_item("list", format!("v{i}")).await.unwrap();
    }

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["list.value".to_string()]);
}

#[tokio::test]
async fn test_keys_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    store.set_item("a/b", "slash".to_string()).await.unwrap();
    store.set_item("a", "plain".to_string()).await.unwrap();

    assert_eq!(store.get_item("a/b").await.unwrap().as_deref(), Some("slash"));
    assert_eq!(store.get_item("a").await.unwrap().as_deref(), Some("plain"));
}

#[tokio::test]
async fn test_remove_item() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    store.set_item("list", "[]".to_string()).await.unwrap();
    store.remove_item("list").await.unwrap();
    assert_eq!(store.get_item("list").await.unwrap(), None);

    // Removing again is fine
    store.remove_item("list").await.unwrap();
}

#[tokio::test]
async fn test_open_creates_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("one").join("two");
    let store = FileKeyValueStore::open(&nested).await.unwrap();

    assert!(nested.is_dir());
    assert_eq!(store.dir(), nested.as_path());
}

#[tokio::test]
async fn test_empty_key_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    let err = store.set_item("", "x".to_string()).await.unwrap_err();
    assert!(matches!(err, KeyValueError::InvalidKey(_)));
}

#[tokio::test]
async fn test_read_of_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();
    std::fs::create_dir(dir.path().join("list.value")).unwrap();

    let err = store.get_item("list").await.unwrap_err();
    assert!(matches!(err, KeyValueError::ReadFailed { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_leave_one_whole_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    let tasks = (0..32)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.set_item("list", format!("value-{i}")).await })
        })
        .collect::<Vec<_>>();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let value = store.get_item("list").await.unwrap().unwrap();
    let n: usize = value.strip_prefix("value-").unwrap().parse().unwrap();
    assert!(n < 32);

    let mut entries = std::fs::read_dir(dir.path()).unwrap();
    assert!(entries.next().is_some());
    assert!(entries.next().is_none());
}

#[tokio::test]
async fn test_write_into_removed_dir_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let store = FileKeyValueStore::open(&data).await.unwrap();
    std::fs::remove_dir(&data).unwrap();

    let result = store.set_item("list", "[]".to_string()).await;

    assert!(matches!(result, Err(KeyValueError::WriteFailed { .. })));
    assert!(!data.exists());
}
