// src/relay.rs

//! Messaging relay handoff.
//!
//! Builds the deep-link URL and pre-filled message handed to the external
//! messaging application. This module only constructs the payload; opening
//! the link and attaching the exported file are manual steps, and the
//! guidance text says so. The link is never awaited or verified.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{LocaleConfig, RelayConfig};

/// A fully constructed relay handoff.
#[derive(Debug, Clone)]
pub struct RelayHandoff {
    /// Normalized phone number with country code
    pub phone: String,

    /// Pre-filled message text
    pub message: String,

    /// Deep-link URL carrying the number and the URL-encoded message
    pub url: Url,

    /// Guidance shown to staff before the handoff
    pub guidance: String,
}

/// Normalize a raw phone number: strip every non-digit character, then
/// prefix the country code when the remainder is a bare local number.
pub fn normalize_phone(raw: &str, relay: &RelayConfig) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == relay.local_number_len {
        format!("{}{}", relay.country_code, digits)
    } else {
        digits
    }
}

/// Build the relay handoff for a document.
///
/// Fails with a user-visible validation message when no phone number
/// survives normalization.
pub fn build_handoff(
    student_name: &str,
    document_title: &str,
    raw_phone: &str,
    school_name: &str,
    relay: &RelayConfig,
    locale: &LocaleConfig,
) -> Result<RelayHandoff> {
    let phone = normalize_phone(raw_phone, relay);
    if phone.is_empty() {
        return Err(AppError::validation(
            locale.messages.enter_guardian_phone.clone(),
        ));
    }

    let message = locale
        .messages
        .relay_message
        .replace("{student}", student_name)
        .replace("{title}", document_title)
        .replace("{school}", school_name);

    let url = Url::parse_with_params(
        &relay.endpoint,
        &[("phone", phone.as_str()), ("text", message.as_str())],
    )?;

    Ok(RelayHandoff {
        phone,
        message,
        url,
        guidance: locale.messages.relay_guidance.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay() -> RelayConfig {
        RelayConfig::default()
    }

    #[test]
    fn test_local_number_gets_country_code() {
        assert_eq!(normalize_phone("99123456", &relay()), "96899123456");
    }

    #[test]
    fn test_non_digits_stripped_before_length_check() {
        assert_eq!(normalize_phone("9912-3456", &relay()), "96899123456");
        assert_eq!(normalize_phone(" 99 12 34 56 ", &relay()), "96899123456");
    }

    #[test]
    fn test_full_number_left_alone() {
        assert_eq!(normalize_phone("+968 99123456", &relay()), "96899123456");
        assert_eq!(normalize_phone("0096899123456", &relay()), "0096899123456");
    }

    #[test]
    fn test_empty_phone_is_a_validation_failure() {
        let result = build_handoff(
            "أحمد",
            "ملحق (5) استمارة إنذار طالب",
            "  -- ",
            "مدرسة الإبداع للبنين (5-8)",
            &relay(),
            &LocaleConfig::default(),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_handoff_url_carries_encoded_message() {
        let handoff = build_handoff(
            "أحمد علي",
            "ملحق (4) تنبيه طالب",
            "99123456",
            "مدرسة الإبداع للبنين (5-8)",
            &relay(),
            &LocaleConfig::default(),
        )
        .unwrap();

        assert_eq!(handoff.phone, "96899123456");
        assert!(handoff.message.contains("أحمد علي"));
        assert!(handoff.message.contains("ملحق (4) تنبيه طالب"));

        let url = handoff.url.as_str();
        assert!(url.starts_with("https://api.whatsapp.com/send?"));
        assert!(url.contains("phone=96899123456"));
        // The Arabic message must be percent-encoded into the query
        assert!(url.contains("text="));
        assert!(!url.contains("السلام"));
    }
}
