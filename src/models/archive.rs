//! Archived document records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ActionData, FormKind};

/// Reason labels used in archive summaries, in fixed display order.
const LABEL_LATENESS: &str = "تأخر";
const LABEL_ABSENCE: &str = "غياب";
const LABEL_BEHAVIOR: &str = "سلوك";
const LABEL_SUSPENSION: &str = "فصل مؤقت";
const LABEL_GENERIC: &str = "إجراء عام";

/// An immutable snapshot of an issued document.
///
/// Carries denormalized display fields for list views plus a full deep copy
/// of the draft, so the exact document can be restored later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Generated unique id
    pub id: Uuid,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    pub student_name: String,
    pub grade: String,

    /// Which document kind was issued
    pub form: FormKind,

    /// Reason summary for list display (e.g. "تأخر، غياب")
    pub details: String,

    /// The full draft at save time, for exact restoration
    pub data: ActionData,
}

impl ArchiveEntry {
    /// Snapshot the current draft into a new archive entry.
    pub fn snapshot(form: FormKind, data: &ActionData) -> ArchiveEntry {
        ArchiveEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            student_name: data.student_name.clone(),
            grade: data.grade.clone(),
            form,
            details: reason_summary(form, data),
            data: data.clone(),
        }
    }
}

/// Build the reason summary for an archive entry: the active reason labels
/// in fixed order, joined by "، " with no trailing separator, or a generic
/// label when nothing is flagged.
pub fn reason_summary(form: FormKind, data: &ActionData) -> String {
    let mut labels = Vec::new();
    if data.reasons.lateness {
        labels.push(LABEL_LATENESS);
    }
    if data.reasons.absence {
        labels.push(LABEL_ABSENCE);
    }
    if data.reasons.behavior {
        labels.push(LABEL_BEHAVIOR);
    }
    if form == FormKind::Annex14Suspension {
        labels.push(LABEL_SUSPENSION);
    }

    if labels.is_empty() {
        LABEL_GENERIC.to_string()
    } else {
        labels.join("، ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_single_reason() {
        let mut data = ActionData::default();
        data.student_name = "خالد".into();
        data.reasons.lateness = true;

        assert_eq!(reason_summary(FormKind::Annex4Alert, &data), "تأخر");
    }

    #[test]
    fn test_summary_joined_without_trailing_separator() {
        let mut data = ActionData::default();
        data.reasons.lateness = true;
        data.reasons.absence = true;
        data.reasons.behavior = true;

        assert_eq!(
            reason_summary(FormKind::Annex5Warning, &data),
            "تأخر، غياب، سلوك"
        );
    }

    #[test]
    fn test_summary_suspension_label_appended() {
        let mut data = ActionData::default();
        data.reasons.behavior = true;

        assert_eq!(
            reason_summary(FormKind::Annex14Suspension, &data),
            "سلوك، فصل مؤقت"
        );
    }

    #[test]
    fn test_summary_defaults_to_generic_label() {
        let data = ActionData::default();
        assert_eq!(reason_summary(FormKind::InvitationGeneral, &data), "إجراء عام");
    }

    #[test]
    fn test_snapshot_embeds_deep_copy() {
        let mut data = ActionData::default();
        data.student_name = "أحمد".into();
        data.grade = "6/2".into();

        let entry = ArchiveEntry::snapshot(FormKind::Annex3Advice, &data);
        assert_eq!(entry.student_name, "أحمد");
        assert_eq!(entry.form, FormKind::Annex3Advice);
        assert_eq!(entry.data, data);

        // Mutating the draft afterwards must not touch the snapshot
        data.student_name = "بدر".into();
        assert_eq!(entry.data.student_name, "أحمد");
    }
}
