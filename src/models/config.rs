//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local persistence settings
    pub storage: StorageConfig,

    /// School identity printed in document letterheads
    pub school: SchoolConfig,

    /// Messaging relay settings
    pub relay: RelayConfig,

    /// Save scheduling behavior
    pub save: SaveConfig,

    /// Export output settings
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.storage.quota_bytes == 0 {
            return Err(AppError::validation("storage.quota_bytes must be > 0"));
        }
        if self.school.school_name.trim().is_empty() {
            return Err(AppError::validation("school.school_name is empty"));
        }
        if self.relay.country_code.is_empty()
            || !self.relay.country_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AppError::validation(
                "relay.country_code must be a non-empty digit string",
            ));
        }
        if self.relay.local_number_len == 0 {
            return Err(AppError::validation("relay.local_number_len must be > 0"));
        }
        if self.save.policy == SavePolicy::Retry && self.save.retry_attempts == 0 {
            return Err(AppError::validation(
                "save.retry_attempts must be > 0 when save.policy is \"retry\"",
            ));
        }
        Ok(())
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the three collection files
    pub root_dir: String,

    /// Advertised storage quota in bytes
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::storage_root(),
            quota_bytes: defaults::quota_bytes(),
        }
    }
}

/// School identity lines printed in letterheads, top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    pub country: String,
    pub ministry: String,
    pub directorate: String,
    pub school_name: String,
}

impl SchoolConfig {
    /// Letterhead lines in display order.
    pub fn letterhead_lines(&self) -> Vec<String> {
        vec![
            self.country.clone(),
            self.ministry.clone(),
            self.directorate.clone(),
            self.school_name.clone(),
        ]
    }
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            country: defaults::country(),
            ministry: defaults::ministry(),
            directorate: defaults::directorate(),
            school_name: defaults::school_name(),
        }
    }
}

/// Messaging relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Deep-link endpoint the handoff URL is built on
    pub endpoint: String,

    /// Country code prepended to local numbers
    pub country_code: String,

    /// Digit count identifying a local number
    pub local_number_len: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::relay_endpoint(),
            country_code: defaults::country_code(),
            local_number_len: defaults::local_number_len(),
        }
    }
}

/// How collection saves are scheduled after mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Save once; failures are logged and the data is lost
    #[default]
    FireAndForget,
    /// Retry failed saves with a fixed backoff
    Retry,
}

/// Save scheduling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub policy: SavePolicy,

    /// Attempts per save under the retry policy
    pub retry_attempts: u32,

    /// Delay between attempts in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            policy: SavePolicy::default(),
            retry_attempts: defaults::retry_attempts(),
            retry_backoff_ms: defaults::retry_backoff_ms(),
        }
    }
}

/// Export output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported documents are written to
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
        }
    }
}

/// User-facing message strings.
///
/// All blocking messages shown to staff live here so a school can adjust
/// the wording without touching code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub messages: MessageLocale,
}

impl LocaleConfig {
    /// Load locale strings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load locale strings with fallback to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Locale load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }
}

/// Blocking and informational messages shown to staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageLocale {
    /// Startup load failed; the system stays on the loading state
    pub load_failed: String,

    /// Archive save refused: no student selected
    pub select_student_first: String,

    /// Archive save confirmation
    pub archive_saved: String,

    /// Prompt required before deleting an archive record
    pub confirm_delete: String,

    /// Archive lookup failed: no record with the given id
    pub record_not_found: String,

    /// Relay refused: no guardian phone
    pub enter_guardian_phone: String,

    /// Relay message template; `{student}`, `{title}` and `{school}` are
    /// substituted
    pub relay_message: String,

    /// Guidance shown before the relay handoff: the exported file must be
    /// attached by hand
    pub relay_guidance: String,

    /// Filename fallback when no student is selected
    pub default_student: String,

    /// Filename fallback when the document kind is unknown
    pub default_document: String,
}

impl Default for MessageLocale {
    fn default() -> Self {
        Self {
            load_failed: "حدث خطأ أثناء تحميل البيانات من قاعدة البيانات.".to_string(),
            select_student_first: "يرجى اختيار طالب أولاً لحفظ السجل.".to_string(),
            archive_saved: "تم حفظ النسخة في السجل بنجاح ✅".to_string(),
            confirm_delete: "هل أنت متأكد من حذف هذا السجل؟".to_string(),
            record_not_found: "السجل المطلوب غير موجود.".to_string(),
            enter_guardian_phone: "يرجى إدخال رقم هاتف ولي الأمر".to_string(),
            relay_message: "السلام عليكم ولي أمر الطالب: {student}\n\nيرجى التكرم بالاطلاع على ملف \"{title}\" المرفق أدناه.\n\nشاكرين تعاونكم،،\n{school}"
                .to_string(),
            relay_guidance: "تنبيه هام جداً:\nسيقوم النظام الآن بفتح محادثة واتساب باستخدام الرابط العميق (API).\n\n⚠️ ملاحظة: بسبب قيود واتساب الأمنية، لا يمكن للبرنامج إرفاق الملف تلقائياً.\n\nلإرسال الملف بنجاح:\n1. قم بتصدير المستند وحفظه على جهازك.\n2. افتح رابط المحادثة أدناه.\n3. قم بسحب الملف وإفلاته داخل المحادثة يدوياً."
                .to_string(),
            default_student: "طالب".to_string(),
            default_document: "وثيقة".to_string(),
        }
    }
}

mod defaults {
    // Storage defaults
    pub fn storage_root() -> String {
        "storage".into()
    }
    pub fn quota_bytes() -> u64 {
        512 * 1024 * 1024
    }

    // School identity defaults
    pub fn country() -> String {
        "سلطنة عمان".into()
    }
    pub fn ministry() -> String {
        "وزارة التعليم".into()
    }
    pub fn directorate() -> String {
        "المديرية العامة للتعليم بمحافظة شمال الباطنة".into()
    }
    pub fn school_name() -> String {
        "مدرسة الإبداع للبنين (5-8)".into()
    }

    // Relay defaults
    pub fn relay_endpoint() -> String {
        "https://api.whatsapp.com/send".into()
    }
    pub fn country_code() -> String {
        "968".into()
    }
    pub fn local_number_len() -> usize {
        8
    }

    // Save defaults
    pub fn retry_attempts() -> u32 {
        3
    }
    pub fn retry_backoff_ms() -> u64 {
        500
    }

    // Export defaults
    pub fn output_dir() -> String {
        "exports".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_country_code() {
        let mut config = Config::default();
        config.relay.country_code = "+968".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_quota() {
        let mut config = Config::default();
        config.storage.quota_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_retry_needs_attempts() {
        let mut config = Config::default();
        config.save.policy = SavePolicy::Retry;
        config.save.retry_attempts = 0;
        assert!(config.validate().is_err());

        config.save.retry_attempts = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_letterhead_lines_order() {
        let school = SchoolConfig::default();
        let lines = school.letterhead_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "سلطنة عمان");
        assert_eq!(lines[3], "مدرسة الإبداع للبنين (5-8)");
    }
}
