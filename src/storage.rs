use crate::errors::StorageError;
use crate::models::AppData;
use crate::store::Snapshot;
use std::{path::Path, path::PathBuf, sync::Arc};
use tokio::fs;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// A missing, unreadable or corrupt file is treated as "no prior data".
pub async fn load_data(path: &Path) -> Option<AppData> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => Some(data),
            Err(err) => {
                error!("failed to parse data file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no data file at {}, starting fresh", path.display());
            None
        }
        Err(err) => {
            error!("failed to read data file: {err}");
            None
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp = temp_path(path);
    fs::write(&tmp, payload)
        .await
        .map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
    fs::rename(&tmp, path)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Demo-only changes are skipped. Failures are logged and the in-memory state
/// stays as it is. The task flushes the last snapshot and exits once every
/// store handle is dropped.
pub fn spawn_writer(path: PathBuf, mut snapshots: watch::Receiver<Snapshot>) -> JoinHandle<()> {
    let mut written = Arc::clone(&snapshots.borrow_and_update().data);
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let data = Arc::clone(&snapshots.borrow_and_update().data);
            if Arc::ptr_eq(&data, &written) {
                continue;
            }
            match persist_data(&path, &data).await {
                Ok(()) => debug!("state written to {}", path.display()),
                Err(err) => error!("failed to save state: {err}"),
            }
            written = data;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_data;
    use crate::store::AppStore;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_data(&dir.path().join("absent.json")).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{ not json").await.unwrap();
        assert!(load_data(&path).await.is_none());
    }

    #[tokio::test]
    async fn partial_log_keeps_the_rest_of_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let raw = r#"{
            "deeds": [
                { "id": "prayer-fajr", "name": "Fajr", "category": "PRAYERS", "isCore": true },
                { "id": "custom-1", "name": "Walk", "category": "CUSTOM" }
            ],
            "logs": [
                { "id": "l1", "deedId": "prayer-fajr", "date": "2025-08-29", "statusId": "jamaah" },
                { "id": "l2", "deedId": "custom-1", "date": "2025-08-30" }
            ]
        }"#;
        fs::write(&path, raw).await.unwrap();

        let data = load_data(&path).await.expect("document should load");
        assert_eq!(data.deeds.len(), 2);
        assert_eq!(data.logs.len(), 2);
        assert_eq!(data.logs[0].status_id, "jamaah");
        assert_eq!(data.logs[1].deed_id, "custom-1");
        assert_eq!(data.logs[1].status_id, "");
    }

    #[tokio::test]
    async fn persisted_document_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let data = seed_data();
        persist_data(&path, &data).await.unwrap();
        assert_eq!(load_data(&path).await, Some(data));
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("state.json");
        let err = persist_data(&path, &seed_data()).await.unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[tokio::test]
    async fn writer_flushes_last_state_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let today = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let store = AppStore::new_at(seed_data(), today);
        let writer = spawn_writer(path.clone(), store.subscribe());

        store.log_status("prayer-fajr", today, "jamaah");
        store.log_status("prayer-fajr", today, "late");
        let expected = store.snapshot().data;
        drop(store);
        writer.await.unwrap();

        let saved = load_data(&path).await.unwrap();
        assert_eq!(saved, *expected);
        assert_eq!(saved.logs.len(), 1);
        assert_eq!(saved.logs[0].status_id, "late");
    }

    #[tokio::test]
    async fn writer_skips_unchanged_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let today = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let store = AppStore::new_at(seed_data(), today);
        let writer = spawn_writer(path.clone(), store.subscribe());

        store.add_suggested("nope");
        drop(store);
        writer.await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("state.json");
        let today = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let store = AppStore::new_at(seed_data(), today);
        let writer = spawn_writer(path, store.subscribe());

        store.log_status("prayer-asr", today, "on-time");
        assert_eq!(store.snapshot().logs().len(), 1);
        drop(store);
        writer.await.unwrap();
    }
}
