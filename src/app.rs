// src/app.rs

//! Application controller.
//!
//! Owns the live draft, the active document kind and the in-memory copies
//! of the three durable collections. Mediates between the student directory
//! (autocomplete), the composer and the persistence layer.
//!
//! ## Load gate
//!
//! All saves are gated on the initial load having completed: until
//! [`App::load_all`] succeeds, every scheduled save is dropped so empty
//! defaults can never clobber good durable state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    ActionData, ArchiveEntry, Config, DirectoryEntry, Field, FormKind, LocaleConfig, RelayConfig,
    SaveConfig, SavePolicy, SchoolConfig, SchoolSettings,
};
use crate::relay::{self, RelayHandoff};
use crate::storage::{CollectionStore, StorageUsage};

/// Filename characters replaced by a dash.
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum autocomplete suggestions shown at once.
const MAX_SUGGESTIONS: usize = 5;

/// A durable collection owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Settings,
    Directory,
    Archive,
}

/// The application controller.
pub struct App<S: CollectionStore + 'static> {
    store: Arc<S>,
    school: SchoolConfig,
    relay: RelayConfig,
    save: SaveConfig,
    locale: LocaleConfig,

    /// Currently selected document kind
    pub active_form: FormKind,

    /// The live draft
    pub draft: ActionData,

    settings: SchoolSettings,
    directory: Vec<DirectoryEntry>,
    archive: Vec<ArchiveEntry>,
    usage: Option<StorageUsage>,

    /// Set once the initial load completed; gates every save
    loaded: bool,

    /// Whether the autocomplete dropdown is open
    suggestions_open: bool,

    /// In-flight background saves, drained before shutdown
    pending_saves: Vec<JoinHandle<()>>,
}

impl<S: CollectionStore + 'static> App<S> {
    /// Create a controller with empty collections and a fresh draft.
    pub fn new(store: Arc<S>, config: &Config, locale: LocaleConfig) -> Self {
        Self {
            store,
            school: config.school.clone(),
            relay: config.relay.clone(),
            save: config.save.clone(),
            locale,
            active_form: FormKind::InvitationGeneral,
            draft: ActionData::default(),
            settings: SchoolSettings::default(),
            directory: Vec::new(),
            archive: Vec::new(),
            usage: None,
            loaded: false,
            suggestions_open: false,
            pending_saves: Vec::new(),
        }
    }

    /// Fetch all three collections and the usage report concurrently.
    ///
    /// The loaded flag flips only after all four operations settle
    /// successfully; on any failure the in-memory collections stay at their
    /// empty defaults and saves remain gated.
    pub async fn load_all(&mut self) -> Result<()> {
        let (settings, directory, archive, usage) = tokio::join!(
            self.store.load_settings(),
            self.store.load_directory(),
            self.store.load_archive(),
            self.store.usage(),
        );

        match (settings, directory, archive, usage) {
            (Ok(settings), Ok(directory), Ok(archive), Ok(usage)) => {
                if let Some(settings) = settings {
                    self.settings = settings;
                }
                if let Some(directory) = directory {
                    self.directory = directory;
                }
                if let Some(archive) = archive {
                    self.archive = archive;
                }
                self.usage = Some(usage);
                self.loaded = true;
                log::info!(
                    "Loaded {} students, {} archive records, {} used of {}",
                    self.directory.len(),
                    self.archive.len(),
                    StorageUsage::human(usage.used_bytes),
                    StorageUsage::human(usage.quota_bytes),
                );
                Ok(())
            }
            (settings, directory, archive, usage) => {
                let cause = settings
                    .err()
                    .or(directory.err())
                    .or(archive.err())
                    .or(usage.err())
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                log::error!("Initial load failed: {}", cause);
                Err(AppError::load(self.locale.messages.load_failed.clone()))
            }
        }
    }

    /// Whether the initial load completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Branding settings currently in memory.
    pub fn settings(&self) -> &SchoolSettings {
        &self.settings
    }

    /// School identity used for letterheads.
    pub fn school(&self) -> &SchoolConfig {
        &self.school
    }

    /// Imported student directory.
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Archive records, newest first.
    pub fn archive(&self) -> &[ArchiveEntry] {
        &self.archive
    }

    /// Storage usage captured at load time.
    pub fn usage(&self) -> Option<StorageUsage> {
        self.usage
    }

    /// Switch the active document kind, re-tagging the draft's payload.
    pub fn set_form(&mut self, kind: FormKind) {
        self.active_form = kind;
        self.draft.retag(kind);
    }

    /// Merge one field update into the draft.
    pub fn update_field(&mut self, field: Field) {
        if matches!(field, Field::StudentName(_)) {
            self.suggestions_open = true;
        }
        self.draft.apply(field);
    }

    /// Prefill the draft from a chosen directory entry and close the
    /// suggestion dropdown.
    pub fn select_directory_entry(&mut self, entry: &DirectoryEntry) {
        self.draft.student_name = entry.name.clone();
        self.draft.grade = entry.grade.clone();
        self.draft.guardian_phone = entry.guardian_phone.clone().unwrap_or_default();
        self.suggestions_open = false;
    }

    /// Whether the autocomplete dropdown is open.
    pub fn suggestions_open(&self) -> bool {
        self.suggestions_open
    }

    /// Lazy autocomplete lookup: directory entries whose name contains the
    /// prefix as a (case-sensitive) substring, excluding an exact full-name
    /// match, capped at five. An empty prefix yields nothing.
    pub fn filter_suggestions<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a DirectoryEntry> + 'a {
        self.directory
            .iter()
            .filter(move |s| !prefix.is_empty() && s.name.contains(prefix) && s.name != prefix)
            .take(MAX_SUGGESTIONS)
    }

    /// Replace the student directory wholesale and schedule a save.
    pub fn import_directory(&mut self, entries: Vec<DirectoryEntry>) {
        self.directory = entries;
        self.schedule_save(Collection::Directory);
    }

    /// Replace the branding settings and schedule a save.
    pub fn update_settings(&mut self, settings: SchoolSettings) {
        self.settings = settings;
        self.schedule_save(Collection::Settings);
    }

    /// Snapshot the draft into the archive (newest first) and schedule a
    /// save. Fails with a visible message when no student is selected; the
    /// archive is left untouched in that case.
    pub fn save_to_archive(&mut self) -> Result<&ArchiveEntry> {
        if self.draft.student_name.is_empty() {
            return Err(AppError::validation(
                self.locale.messages.select_student_first.clone(),
            ));
        }

        let entry = ArchiveEntry::snapshot(self.active_form, &self.draft);
        self.archive.insert(0, entry);
        self.schedule_save(Collection::Archive);
        Ok(&self.archive[0])
    }

    /// Delete an archive record. Irreversible; the caller must have asked
    /// the user for confirmation first.
    pub fn delete_archive_entry(&mut self, id: Uuid, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(AppError::validation(
                self.locale.messages.confirm_delete.clone(),
            ));
        }
        let before = self.archive.len();
        self.archive.retain(|entry| entry.id != id);
        if self.archive.len() == before {
            return Err(AppError::validation(
                self.locale.messages.record_not_found.clone(),
            ));
        }
        self.schedule_save(Collection::Archive);
        Ok(())
    }

    /// Restore an archive record: copy its embedded draft back into the
    /// live draft and switch the active kind. The record stays archived.
    pub fn restore_archive_entry(&mut self, id: Uuid) -> Result<FormKind> {
        let entry = self
            .archive
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| {
                AppError::validation(self.locale.messages.record_not_found.clone())
            })?;
        self.draft = entry.data.clone();
        self.active_form = entry.form;
        Ok(entry.form)
    }

    /// Derive a filesystem-safe export filename from the draft and the
    /// active document title.
    pub fn compute_export_filename(&self) -> String {
        let student = if self.draft.student_name.is_empty() {
            self.locale.messages.default_student.as_str()
        } else {
            self.draft.student_name.as_str()
        };
        let grade = if self.draft.grade.is_empty() {
            String::new()
        } else {
            format!(" - {}", self.draft.grade)
        };

        let raw = format!("{}{} - {}", student, grade, self.active_form.title());
        raw.chars()
            .map(|c| if ILLEGAL_FILENAME_CHARS.contains(&c) { '-' } else { c })
            .collect()
    }

    /// Build the messaging handoff for the current draft.
    pub fn build_relay_handoff(&self) -> Result<RelayHandoff> {
        relay::build_handoff(
            &self.draft.student_name,
            self.active_form.title(),
            &self.draft.guardian_phone,
            &self.school.school_name,
            &self.relay,
            &self.locale,
        )
    }

    /// Schedule a background save of one collection.
    ///
    /// Dropped silently while the load gate is closed. Failures are logged
    /// and otherwise lost under the fire-and-forget policy; the retry policy
    /// re-attempts with a fixed backoff.
    fn schedule_save(&mut self, collection: Collection) {
        if !self.loaded {
            log::debug!("Save of {:?} skipped: initial load not finished", collection);
            return;
        }

        enum Payload {
            Settings(SchoolSettings),
            Directory(Vec<DirectoryEntry>),
            Archive(Vec<ArchiveEntry>),
        }

        let payload = match collection {
            Collection::Settings => Payload::Settings(self.settings.clone()),
            Collection::Directory => Payload::Directory(self.directory.clone()),
            Collection::Archive => Payload::Archive(self.archive.clone()),
        };
        let store = Arc::clone(&self.store);
        let save = self.save.clone();

        let handle = tokio::spawn(async move {
            let attempts = match save.policy {
                SavePolicy::FireAndForget => 1,
                SavePolicy::Retry => save.retry_attempts.max(1),
            };

            for attempt in 1..=attempts {
                let result = match &payload {
                    Payload::Settings(v) => store.save_settings(v).await,
                    Payload::Directory(v) => store.save_directory(v).await,
                    Payload::Archive(v) => store.save_archive(v).await,
                };

                match result {
                    Ok(()) => return,
                    Err(e) if attempt < attempts => {
                        log::warn!(
                            "Save of {:?} failed (attempt {}/{}): {}. Retrying.",
                            collection,
                            attempt,
                            attempts,
                            e
                        );
                        tokio::time::sleep(Duration::from_millis(save.retry_backoff_ms)).await;
                    }
                    Err(e) => {
                        // Accepted limitation: the failed save is lost
                        log::error!("Save of {:?} failed: {}", collection, e);
                    }
                }
            }
        });
        self.pending_saves.push(handle);
    }

    /// Await every in-flight save. Called before process exit so one-shot
    /// invocations never race their own background writes.
    pub async fn drain_saves(&mut self) {
        for handle in self.pending_saves.drain(..) {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    fn entry(name: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            grade: "5/1".to_string(),
            guardian_phone: Some("99123456".to_string()),
        }
    }

    async fn loaded_app() -> (TempDir, App<LocalStore>) {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path(), 1024 * 1024));
        let mut app = App::new(store, &Config::default(), LocaleConfig::default());
        app.load_all().await.unwrap();
        (tmp, app)
    }

    #[tokio::test]
    async fn test_load_all_from_empty_store() {
        let (_tmp, app) = loaded_app().await;
        assert!(app.is_loaded());
        assert!(app.directory().is_empty());
        assert!(app.archive().is_empty());
        assert!(app.usage().is_some());
    }

    #[tokio::test]
    async fn test_save_gated_until_loaded() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path(), 1024 * 1024));
        let mut app = App::new(store, &Config::default(), LocaleConfig::default());

        // Mutations before load_all must not touch the store
        app.import_directory(vec![entry("أحمد علي")]);
        app.drain_saves().await;
        assert!(!tmp.path().join("students.json").exists());

        app.load_all().await.unwrap();
        // The gated import kept the in-memory copy; persist it now
        app.import_directory(vec![entry("أحمد علي")]);
        app.drain_saves().await;
        assert!(tmp.path().join("students.json").exists());
    }

    #[tokio::test]
    async fn test_filter_suggestions_semantics() {
        let (_tmp, mut app) = loaded_app().await;
        app.import_directory(vec![entry("Ahmed Ali"), entry("Ahmed Said"), entry("Omar")]);

        let names: Vec<&str> = app
            .filter_suggestions("Ahmed")
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ahmed Ali", "Ahmed Said"]);

        // An exact full-name match is excluded
        let names: Vec<&str> = app
            .filter_suggestions("Ahmed Ali")
            .map(|s| s.name.as_str())
            .collect();
        assert!(names.is_empty());

        // Empty prefix yields nothing
        assert_eq!(app.filter_suggestions("").count(), 0);

        app.drain_saves().await;
    }

    #[tokio::test]
    async fn test_filter_suggestions_capped_at_five() {
        let (_tmp, mut app) = loaded_app().await;
        let entries: Vec<DirectoryEntry> =
            (0..8).map(|i| entry(&format!("Ahmed {}", i))).collect();
        app.import_directory(entries);

        assert_eq!(app.filter_suggestions("Ahmed").count(), 5);
        app.drain_saves().await;
    }

    #[tokio::test]
    async fn test_select_directory_entry_prefills_draft() {
        let (_tmp, mut app) = loaded_app().await;
        app.update_field(Field::StudentName("أح".into()));
        assert!(app.suggestions_open());

        app.select_directory_entry(&entry("أحمد علي"));
        assert_eq!(app.draft.student_name, "أحمد علي");
        assert_eq!(app.draft.grade, "5/1");
        assert_eq!(app.draft.guardian_phone, "99123456");
        assert!(!app.suggestions_open());
    }

    #[tokio::test]
    async fn test_save_to_archive_requires_student_name() {
        let (_tmp, mut app) = loaded_app().await;

        let result = app.save_to_archive();
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(app.archive().is_empty());
    }

    #[tokio::test]
    async fn test_save_to_archive_summary_and_ordering() {
        let (_tmp, mut app) = loaded_app().await;
        app.update_field(Field::StudentName("Khalid".into()));
        app.update_field(Field::ReasonLateness(true));

        let entry = app.save_to_archive().unwrap();
        assert_eq!(entry.details, "تأخر");

        // Newest first
        app.update_field(Field::StudentName("Omar".into()));
        app.save_to_archive().unwrap();
        assert_eq!(app.archive()[0].student_name, "Omar");
        assert_eq!(app.archive()[1].student_name, "Khalid");

        app.drain_saves().await;
    }

    #[tokio::test]
    async fn test_restore_round_trip() {
        let (_tmp, mut app) = loaded_app().await;
        app.set_form(FormKind::Annex5Warning);
        app.update_field(Field::StudentName("خالد".into()));
        app.update_field(Field::ReasonAbsence(true));
        app.update_field(Field::AbsenceDates("أسبوع".into()));
        app.update_field(Field::ArticleNo("5".into()));

        let id = app.save_to_archive().unwrap().id;
        let saved_draft = app.draft.clone();

        // Wander off to a different form and draft
        app.set_form(FormKind::InvitationGeneral);
        app.draft = ActionData::default();

        let restored_kind = app.restore_archive_entry(id).unwrap();
        assert_eq!(restored_kind, FormKind::Annex5Warning);
        assert_eq!(app.active_form, FormKind::Annex5Warning);
        assert_eq!(app.draft, saved_draft);

        // The archive record is still there
        assert_eq!(app.archive().len(), 1);
        app.drain_saves().await;
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (_tmp, mut app) = loaded_app().await;
        app.update_field(Field::StudentName("خالد".into()));
        let id = app.save_to_archive().unwrap().id;

        let result = app.delete_archive_entry(id, false);
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(app.archive().len(), 1);

        app.delete_archive_entry(id, true).unwrap();
        assert!(app.archive().is_empty());

        let result = app.delete_archive_entry(id, true);
        assert!(matches!(result, Err(AppError::Validation(_))));
        app.drain_saves().await;
    }

    #[tokio::test]
    async fn test_export_filename_sanitized() {
        let (_tmp, mut app) = loaded_app().await;
        app.set_form(FormKind::Annex5Warning);
        app.update_field(Field::StudentName("Ali".into()));
        app.update_field(Field::Grade("5/1".into()));

        let name = app.compute_export_filename();
        assert_eq!(name, "Ali - 5-1 - ملحق (5) استمارة إنذار طالب");
    }

    #[tokio::test]
    async fn test_export_filename_defaults() {
        let (_tmp, app) = loaded_app().await;
        let name = app.compute_export_filename();
        // No student and no grade: placeholder plus title only
        assert_eq!(name, "طالب - دعوة ولي أمر (عام)");
    }

    #[tokio::test]
    async fn test_relay_handoff_through_controller() {
        let (_tmp, mut app) = loaded_app().await;
        app.update_field(Field::StudentName("أحمد".into()));
        app.update_field(Field::GuardianPhone("99123456".into()));

        let handoff = app.build_relay_handoff().unwrap();
        assert_eq!(handoff.phone, "96899123456");

        app.update_field(Field::GuardianPhone("".into()));
        assert!(matches!(
            app.build_relay_handoff(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_archive_persists_across_controllers() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path(), 1024 * 1024));
        let config = Config::default();

        let mut app = App::new(Arc::clone(&store), &config, LocaleConfig::default());
        app.load_all().await.unwrap();
        app.update_field(Field::StudentName("خالد".into()));
        app.update_field(Field::ReasonBehavior(true));
        let id = app.save_to_archive().unwrap().id;
        app.drain_saves().await;

        // A fresh controller over the same store sees the record
        let mut app = App::new(store, &config, LocaleConfig::default());
        app.load_all().await.unwrap();
        assert_eq!(app.archive().len(), 1);
        assert_eq!(app.archive()[0].id, id);
        assert_eq!(app.archive()[0].details, "سلوك");
    }
}
