//! Storage abstractions for the three durable collections.
//!
//! The store is a pass-through durability mechanism with no business logic:
//! settings, the student directory and the archive are saved and loaded
//! whole. Structural fidelity is the contract — a collection read back must
//! deep-equal the collection written.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── settings.json     # School branding assets
//! ├── students.json     # Imported student directory
//! └── archive.json      # Archived document snapshots
//! ```

pub mod local;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{ArchiveEntry, DirectoryEntry, SchoolSettings};

// Re-export for convenience
pub use local::LocalStore;

/// Storage usage report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StorageUsage {
    /// Bytes currently used by the collection files
    pub used_bytes: u64,
    /// Advertised quota in bytes
    pub quota_bytes: u64,
}

impl StorageUsage {
    /// Human-readable byte count (e.g. "1.2 MB").
    pub fn human(bytes: u64) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut value = bytes as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", bytes, UNITS[unit])
        } else {
            format!("{:.1} {}", value, UNITS[unit])
        }
    }
}

/// Trait for collection storage backends.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Load the branding settings. `None` when never saved.
    async fn load_settings(&self) -> Result<Option<SchoolSettings>>;

    /// Persist the branding settings.
    async fn save_settings(&self, settings: &SchoolSettings) -> Result<()>;

    /// Load the student directory. `None` when never saved.
    async fn load_directory(&self) -> Result<Option<Vec<DirectoryEntry>>>;

    /// Persist the student directory (wholesale replacement).
    async fn save_directory(&self, entries: &[DirectoryEntry]) -> Result<()>;

    /// Load the archive, newest first. `None` when never saved.
    async fn load_archive(&self) -> Result<Option<Vec<ArchiveEntry>>>;

    /// Persist the archive.
    async fn save_archive(&self, entries: &[ArchiveEntry]) -> Result<()>;

    /// Report storage usage against the configured quota.
    async fn usage(&self) -> Result<StorageUsage>;
}
