//! Hot reload against files on disk.

use std::fs;

use autoscaler_config::config::{ConfigError, ConfigStore, ReloadOutcome};
use serde_json::json;

mod common;

fn write(dir: &tempfile::TempDir, document: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("cluster.json");
    fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path
}

#[test]
fn test_reload_applies_valid_change() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = common::valid_document();
    let path = write(&dir, &doc);

    let store = ConfigStore::open(&path, None).unwrap();
    assert_eq!(store.current().config.max_workers, 3);

    doc["maxWorkers"] = json!(8);
    write(&dir, &doc);
    assert_eq!(
        store.reload_from(&path, None).unwrap(),
        ReloadOutcome::Applied { generation: 2 }
    );
    assert_eq!(store.current().config.max_workers, 8);
}

#[test]
fn test_invalid_reload_keeps_last_known_good() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = common::valid_document();
    let path = write(&dir, &doc);
    let store = ConfigStore::open(&path, None).unwrap();

    doc["upscalingSpeed"] = json!(-2.0);
    write(&dir, &doc);
    let err = store.reload_from(&path, None).unwrap_err();
    assert_eq!(err.report().unwrap().errors.len(), 1);
    assert_eq!(store.current().config.upscaling_speed, 1.0);
    assert_eq!(store.generation(), 1);

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(store.reload_from(&path, None), Err(ConfigError::Parse(_))));
    assert_eq!(store.current().config.name, "example-cluster");
}

#[test]
fn test_reload_of_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, &common::valid_document());
    let store = ConfigStore::open(&path, None).unwrap();

    fs::remove_file(&path).unwrap();
    assert!(matches!(store.reload_from(&path, None), Err(ConfigError::Io { .. })));
    assert_eq!(store.generation(), 1);
}

#[test]
fn test_reformatted_document_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::valid_document();
    let path = write(&dir, &doc);
    let store = ConfigStore::open(&path, None).unwrap();

    fs::write(&path, doc.to_string()).unwrap();
    assert_eq!(store.reload_from(&path, None).unwrap(), ReloadOutcome::Unchanged);
}

#[tokio::test]
async fn test_watcher_forwards_reload_on_write() {
    use std::time::Duration;

    use autoscaler_config::config::watcher::ConfigWatcher;

    let dir = tempfile::tempdir().unwrap();
    let mut doc = common::valid_document();
    let path = write(&dir, &doc);
    let store = ConfigStore::open(&path, None).unwrap();

    let (watcher, mut updates) = ConfigWatcher::new(&path, None);
    let _watcher = watcher.run().unwrap();

    doc["idleTimeoutMinutes"] = json!(30);
    write(&dir, &doc);

    // A write can surface as several events, some seeing a truncated file.
    let applied = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(result) = updates.recv().await {
            if let Ok(ReloadOutcome::Applied { generation }) = store.apply(result) {
                return generation;
            }
        }
        0
    })
    .await
    .expect("watcher should report the change");

    assert_eq!(applied, 2);
    assert_eq!(store.current().config.idle_timeout_minutes, 30);
}
