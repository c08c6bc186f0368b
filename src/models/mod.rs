// src/models/mod.rs

//! Domain models for the application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod action;
mod archive;
mod config;
mod form;
mod settings;
mod student;

// Re-export all public types
pub use action::{
    ActionData, Deadline, Field, FormPayload, InvitationFields, LetterRef, NoticeFields, Reasons,
    Recipient, SuspensionFields,
};
pub use archive::{ArchiveEntry, reason_summary};
pub use config::{Config, ExportConfig, LocaleConfig, RelayConfig, SaveConfig, SavePolicy,
    SchoolConfig, StorageConfig};
pub use form::FormKind;
pub use settings::SchoolSettings;
pub use student::DirectoryEntry;
