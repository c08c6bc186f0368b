//! School branding assets.

use serde::{Deserialize, Serialize};

/// Branding images stamped onto generated documents.
///
/// Each asset is a base64 image payload and stays unset until staff
/// configure it; an absent asset renders as empty space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolSettings {
    pub ministry_logo: Option<String>,
    pub school_stamp: Option<String>,
    pub principal_signature: Option<String>,
    pub committee_head_signature: Option<String>,
}

impl SchoolSettings {
    /// Count of configured assets, for status displays.
    pub fn configured_count(&self) -> usize {
        [
            &self.ministry_logo,
            &self.school_stamp,
            &self.principal_signature,
            &self.committee_head_signature,
        ]
        .iter()
        .filter(|a| a.is_some())
        .count()
    }
}
