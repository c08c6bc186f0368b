//! Student directory entry.

use serde::{Deserialize, Serialize};

/// A student known to the school, used for autocomplete and prefill.
///
/// Entries are imported in bulk and replaced wholesale on re-import; they
/// are never edited individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Full student name
    pub name: String,

    /// Class designation (e.g. "5/1")
    pub grade: String,

    /// Guardian phone number, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_phone: Option<String>,
}
