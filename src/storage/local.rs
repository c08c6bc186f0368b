//! Local filesystem storage implementation.
//!
//! Each collection lives in one JSON file under the store's root directory.
//! Writes are atomic (write to temp, then rename) so a crash mid-save never
//! corrupts the previous durable state.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ArchiveEntry, DirectoryEntry, SchoolSettings};
use crate::storage::{CollectionStore, StorageUsage};

/// Collection file names.
const SETTINGS_FILE: &str = "settings.json";
const STUDENTS_FILE: &str = "students.json";
const ARCHIVE_FILE: &str = "archive.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
    quota_bytes: u64,
}

impl LocalStore {
    /// Create a new store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, quota_bytes: u64) -> Self {
        Self {
            root_dir: root_dir.into(),
            quota_bytes,
        }
    }

    /// Get the full path for a collection file.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Size of one collection file, zero when absent.
    async fn file_size(&self, key: &str) -> u64 {
        match tokio::fs::metadata(self.path(key)).await {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl CollectionStore for LocalStore {
    async fn load_settings(&self) -> Result<Option<SchoolSettings>> {
        self.read_json(SETTINGS_FILE).await
    }

    async fn save_settings(&self, settings: &SchoolSettings) -> Result<()> {
        self.write_json(SETTINGS_FILE, settings).await
    }

    async fn load_directory(&self) -> Result<Option<Vec<DirectoryEntry>>> {
        self.read_json(STUDENTS_FILE).await
    }

    async fn save_directory(&self, entries: &[DirectoryEntry]) -> Result<()> {
        self.write_json(STUDENTS_FILE, entries).await
    }

    async fn load_archive(&self) -> Result<Option<Vec<ArchiveEntry>>> {
        self.read_json(ARCHIVE_FILE).await
    }

    async fn save_archive(&self, entries: &[ArchiveEntry]) -> Result<()> {
        self.write_json(ARCHIVE_FILE, entries).await
    }

    async fn usage(&self) -> Result<StorageUsage> {
        let mut used_bytes = 0;
        for key in [SETTINGS_FILE, STUDENTS_FILE, ARCHIVE_FILE] {
            used_bytes += self.file_size(key).await;
        }
        Ok(StorageUsage {
            used_bytes,
            quota_bytes: self.quota_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionData, FormKind};
    use tempfile::TempDir;

    const QUOTA: u64 = 1024 * 1024;

    #[tokio::test]
    async fn test_load_absent_collections() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), QUOTA);

        assert!(store.load_settings().await.unwrap().is_none());
        assert!(store.load_directory().await.unwrap().is_none());
        assert!(store.load_archive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), QUOTA);

        let mut settings = SchoolSettings::default();
        settings.ministry_logo = Some("aGVsbG8=".to_string());

        store.save_settings(&settings).await.unwrap();
        let loaded = store.load_settings().await.unwrap().unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_directory_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), QUOTA);

        let entries = vec![
            DirectoryEntry {
                name: "أحمد علي".to_string(),
                grade: "5/1".to_string(),
                guardian_phone: Some("99123456".to_string()),
            },
            DirectoryEntry {
                name: "عمر".to_string(),
                grade: "6/2".to_string(),
                guardian_phone: None,
            },
        ];

        store.save_directory(&entries).await.unwrap();
        let loaded = store.load_directory().await.unwrap().unwrap();
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn test_archive_round_trip_preserves_nested_draft() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), QUOTA);

        let mut data = ActionData::default();
        data.student_name = "خالد".into();
        data.retag(FormKind::Annex5Warning);
        data.reasons.lateness = true;
        data.reasons.lateness_dates = "2026-02-01".into();

        let entries = vec![ArchiveEntry::snapshot(FormKind::Annex5Warning, &data)];
        store.save_archive(&entries).await.unwrap();

        let loaded = store.load_archive().await.unwrap().unwrap();
        assert_eq!(loaded, entries);
        assert_eq!(loaded[0].data, data);
    }

    #[tokio::test]
    async fn test_usage_counts_collection_files() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), QUOTA);

        let before = store.usage().await.unwrap();
        assert_eq!(before.used_bytes, 0);
        assert_eq!(before.quota_bytes, QUOTA);

        store
            .save_settings(&SchoolSettings::default())
            .await
            .unwrap();
        let after = store.usage().await.unwrap();
        assert!(after.used_bytes > 0);
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), QUOTA);

        store.save_directory(&[]).await.unwrap();
        assert!(!tmp.path().join("students.tmp").exists());
        assert!(tmp.path().join("students.json").exists());
    }
}
