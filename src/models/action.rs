//! The action draft: the record staff edit before printing or archiving.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::FormKind;

/// The mutable draft for a single student action.
///
/// Identity and reason fields are shared by every document kind; fields that
/// only exist for one family of documents live in the tagged [`FormPayload`].
/// Every field is defaultable: missing values render as dotted blanks, never
/// as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionData {
    pub student_name: String,
    pub grade: String,
    /// Internal reference number shown in annex headers
    pub document_number: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    /// Guardian civil id, bound by the pledge form
    pub guardian_civil_id: String,
    /// Action or invitation date (YYYY-MM-DD)
    pub incident_date: String,
    pub academic_year: String,

    pub reasons: Reasons,

    /// Fields specific to one document family
    pub payload: FormPayload,

    /// Identity of whoever signs for receipt of the notice
    pub recipient: Recipient,

    /// Principal line printed in the signature block
    pub admin_name: String,
    pub social_worker_name: String,
}

impl Default for ActionData {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            grade: String::new(),
            document_number: String::new(),
            guardian_name: String::new(),
            guardian_phone: String::new(),
            guardian_civil_id: String::new(),
            incident_date: Local::now().format("%Y-%m-%d").to_string(),
            academic_year: "2025 / 2026".to_string(),
            reasons: Reasons::default(),
            payload: FormPayload::default(),
            recipient: Recipient::default(),
            admin_name: "مدير المدرسة".to_string(),
            social_worker_name: String::new(),
        }
    }
}

/// The three reason flags and their detail text.
///
/// Detail text is only meaningful while the matching flag is set; the
/// composer drops it otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reasons {
    pub lateness: bool,
    pub lateness_dates: String,
    pub absence: bool,
    pub absence_dates: String,
    pub behavior: bool,
    pub behavior_details: String,
}

impl Reasons {
    /// True when no reason flag is set.
    pub fn is_empty(&self) -> bool {
        !self.lateness && !self.absence && !self.behavior
    }
}

/// Receipt acknowledgment identity printed at the bottom of annex forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    pub name: String,
    pub relation: String,
    pub civil_id: String,
    pub phone: String,
}

/// Variant-family payload attached to the draft.
///
/// Tagging the payload by family makes "only meaningful for kind X" an
/// enforced shape instead of a comment: switching to another family resets
/// the payload to that family's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPayload {
    /// Guardian invitations (general, teacher, summons)
    Invitation(InvitationFields),
    /// Annex 3/4/5 notice forms
    Notice(NoticeFields),
    /// Annex 6 pledge form (commitments reuse the reason flags)
    Pledge,
    /// Annex 14 temporary suspension order
    Suspension(SuspensionFields),
}

impl Default for FormPayload {
    fn default() -> Self {
        FormPayload::Invitation(InvitationFields::default())
    }
}

impl FormPayload {
    /// Default payload for a document kind.
    pub fn default_for(kind: FormKind) -> FormPayload {
        match kind {
            FormKind::InvitationGeneral
            | FormKind::InvitationTeacher
            | FormKind::InvitationSuspension => {
                FormPayload::Invitation(InvitationFields::default())
            }
            FormKind::Annex3Advice | FormKind::Annex4Alert | FormKind::Annex5Warning => {
                FormPayload::Notice(NoticeFields::default())
            }
            FormKind::Annex6Pledge => FormPayload::Pledge,
            FormKind::Annex14Suspension => FormPayload::Suspension(SuspensionFields::default()),
        }
    }

    /// True when this payload already belongs to `kind`'s family.
    pub fn matches(&self, kind: FormKind) -> bool {
        matches!(
            (self, FormPayload::default_for(kind)),
            (FormPayload::Invitation(_), FormPayload::Invitation(_))
                | (FormPayload::Notice(_), FormPayload::Notice(_))
                | (FormPayload::Pledge, FormPayload::Pledge)
                | (FormPayload::Suspension(_), FormPayload::Suspension(_))
        )
    }
}

/// Invitation-only fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationFields {
    /// Attendance deadline; exactly one choice is active at a time
    pub deadline: Deadline,
    /// Teacher to be met (teacher invitation only)
    pub teacher_name: String,
    /// Subject taught (teacher invitation only)
    pub subject_name: String,
}

/// Notice-family fields (annex 3/4/5).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeFields {
    /// Regulation article number cited by the notice
    pub article_no: String,
    /// First prior letter (annex 4: its subject is the "regarding" line)
    pub letter1: LetterRef,
    /// Second prior letter (annex 5 only)
    pub letter2: LetterRef,
}

/// Suspension-order fields (annex 14).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspensionFields {
    pub letter1: LetterRef,
    pub letter2: LetterRef,
    pub article_no: String,
    /// Suspension duration in days, as written on the form
    pub suspension_days: String,
}

/// Reference to a previously sent letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterRef {
    pub number: String,
    pub date: String,
    pub subject: String,
}

/// Invitation attendance deadline. Single-choice by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    #[default]
    One,
    Two,
    Three,
}

impl Deadline {
    /// Number of days the deadline allows.
    pub fn days(&self) -> u8 {
        match self {
            Deadline::One => 1,
            Deadline::Two => 2,
            Deadline::Three => 3,
        }
    }

    /// Parse a day count.
    pub fn from_days(days: u8) -> Option<Deadline> {
        match days {
            1 => Some(Deadline::One),
            2 => Some(Deadline::Two),
            3 => Some(Deadline::Three),
            _ => None,
        }
    }

    /// Label printed next to the choice box.
    pub fn label(&self) -> &'static str {
        match self {
            Deadline::One => "يوماً واحداً",
            Deadline::Two => "يومين",
            Deadline::Three => "ثلاثة أيام",
        }
    }
}

/// A single typed field update applied to the draft.
///
/// Checkbox fields carry booleans, everything else carries text; no further
/// validation happens at this level.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    StudentName(String),
    Grade(String),
    DocumentNumber(String),
    GuardianName(String),
    GuardianPhone(String),
    GuardianCivilId(String),
    IncidentDate(String),
    AcademicYear(String),
    ReasonLateness(bool),
    LatenessDates(String),
    ReasonAbsence(bool),
    AbsenceDates(String),
    ReasonBehavior(bool),
    BehaviorDetails(String),
    Deadline(Deadline),
    TeacherName(String),
    SubjectName(String),
    ArticleNo(String),
    Letter1No(String),
    Letter1Date(String),
    Letter1Subject(String),
    Letter2No(String),
    Letter2Date(String),
    Letter2Subject(String),
    SuspensionDays(String),
    RecipientName(String),
    RecipientRelation(String),
    RecipientCivilId(String),
    RecipientPhone(String),
    AdminName(String),
    SocialWorkerName(String),
}

impl Field {
    /// Parse a named field update from text, coercing checkbox fields to
    /// booleans. Unknown names return `None`.
    pub fn parse(name: &str, value: &str) -> Option<Field> {
        let flag = || matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on");
        let text = || value.to_string();

        let field = match name {
            "student_name" => Field::StudentName(text()),
            "grade" => Field::Grade(text()),
            "document_number" => Field::DocumentNumber(text()),
            "guardian_name" => Field::GuardianName(text()),
            "guardian_phone" => Field::GuardianPhone(text()),
            "guardian_civil_id" => Field::GuardianCivilId(text()),
            "incident_date" => Field::IncidentDate(text()),
            "academic_year" => Field::AcademicYear(text()),
            "reason_lateness" => Field::ReasonLateness(flag()),
            "lateness_dates" => Field::LatenessDates(text()),
            "reason_absence" => Field::ReasonAbsence(flag()),
            "absence_dates" => Field::AbsenceDates(text()),
            "reason_behavior" => Field::ReasonBehavior(flag()),
            "behavior_details" => Field::BehaviorDetails(text()),
            "deadline" => Field::Deadline(Deadline::from_days(value.trim().parse().ok()?)?),
            "teacher_name" => Field::TeacherName(text()),
            "subject_name" => Field::SubjectName(text()),
            "article_no" => Field::ArticleNo(text()),
            "letter1_no" => Field::Letter1No(text()),
            "letter1_date" => Field::Letter1Date(text()),
            "letter1_subject" => Field::Letter1Subject(text()),
            "letter2_no" => Field::Letter2No(text()),
            "letter2_date" => Field::Letter2Date(text()),
            "letter2_subject" => Field::Letter2Subject(text()),
            "suspension_days" => Field::SuspensionDays(text()),
            "recipient_name" => Field::RecipientName(text()),
            "recipient_relation" => Field::RecipientRelation(text()),
            "recipient_civil_id" => Field::RecipientCivilId(text()),
            "recipient_phone" => Field::RecipientPhone(text()),
            "admin_name" => Field::AdminName(text()),
            "social_worker_name" => Field::SocialWorkerName(text()),
            _ => return None,
        };
        Some(field)
    }
}

impl ActionData {
    /// Switch the draft to `kind`'s family, keeping the payload when the
    /// family is unchanged and resetting it otherwise.
    pub fn retag(&mut self, kind: FormKind) {
        if !self.payload.matches(kind) {
            self.payload = FormPayload::default_for(kind);
        }
    }

    /// Merge a single field update into the draft.
    ///
    /// Payload fields re-tag the draft to the family that owns them; letter
    /// and article fields stay with the current family when both the notice
    /// and suspension families carry them.
    pub fn apply(&mut self, field: Field) {
        match field {
            Field::StudentName(v) => self.student_name = v,
            Field::Grade(v) => self.grade = v,
            Field::DocumentNumber(v) => self.document_number = v,
            Field::GuardianName(v) => self.guardian_name = v,
            Field::GuardianPhone(v) => self.guardian_phone = v,
            Field::GuardianCivilId(v) => self.guardian_civil_id = v,
            Field::IncidentDate(v) => self.incident_date = v,
            Field::AcademicYear(v) => self.academic_year = v,
            Field::ReasonLateness(v) => self.reasons.lateness = v,
            Field::LatenessDates(v) => self.reasons.lateness_dates = v,
            Field::ReasonAbsence(v) => self.reasons.absence = v,
            Field::AbsenceDates(v) => self.reasons.absence_dates = v,
            Field::ReasonBehavior(v) => self.reasons.behavior = v,
            Field::BehaviorDetails(v) => self.reasons.behavior_details = v,
            Field::Deadline(v) => self.invitation_mut().deadline = v,
            Field::TeacherName(v) => self.invitation_mut().teacher_name = v,
            Field::SubjectName(v) => self.invitation_mut().subject_name = v,
            Field::ArticleNo(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.article_no = v,
                _ => self.notice_mut().article_no = v,
            },
            Field::Letter1No(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.letter1.number = v,
                _ => self.notice_mut().letter1.number = v,
            },
            Field::Letter1Date(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.letter1.date = v,
                _ => self.notice_mut().letter1.date = v,
            },
            Field::Letter1Subject(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.letter1.subject = v,
                _ => self.notice_mut().letter1.subject = v,
            },
            Field::Letter2No(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.letter2.number = v,
                _ => self.notice_mut().letter2.number = v,
            },
            Field::Letter2Date(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.letter2.date = v,
                _ => self.notice_mut().letter2.date = v,
            },
            Field::Letter2Subject(v) => match &mut self.payload {
                FormPayload::Suspension(f) => f.letter2.subject = v,
                _ => self.notice_mut().letter2.subject = v,
            },
            Field::SuspensionDays(v) => self.suspension_mut().suspension_days = v,
            Field::RecipientName(v) => self.recipient.name = v,
            Field::RecipientRelation(v) => self.recipient.relation = v,
            Field::RecipientCivilId(v) => self.recipient.civil_id = v,
            Field::RecipientPhone(v) => self.recipient.phone = v,
            Field::AdminName(v) => self.admin_name = v,
            Field::SocialWorkerName(v) => self.social_worker_name = v,
        }
    }

    /// Invitation payload, read-only. `None` for other families.
    pub fn invitation(&self) -> Option<&InvitationFields> {
        match &self.payload {
            FormPayload::Invitation(f) => Some(f),
            _ => None,
        }
    }

    /// Notice payload, read-only. `None` for other families.
    pub fn notice(&self) -> Option<&NoticeFields> {
        match &self.payload {
            FormPayload::Notice(f) => Some(f),
            _ => None,
        }
    }

    /// Suspension payload, read-only. `None` for other families.
    pub fn suspension(&self) -> Option<&SuspensionFields> {
        match &self.payload {
            FormPayload::Suspension(f) => Some(f),
            _ => None,
        }
    }

    fn invitation_mut(&mut self) -> &mut InvitationFields {
        if !matches!(self.payload, FormPayload::Invitation(_)) {
            self.payload = FormPayload::Invitation(InvitationFields::default());
        }
        match &mut self.payload {
            FormPayload::Invitation(f) => f,
            _ => unreachable!(),
        }
    }

    fn notice_mut(&mut self) -> &mut NoticeFields {
        if !matches!(self.payload, FormPayload::Notice(_)) {
            self.payload = FormPayload::Notice(NoticeFields::default());
        }
        match &mut self.payload {
            FormPayload::Notice(f) => f,
            _ => unreachable!(),
        }
    }

    fn suspension_mut(&mut self) -> &mut SuspensionFields {
        if !matches!(self.payload, FormPayload::Suspension(_)) {
            self.payload = FormPayload::Suspension(SuspensionFields::default());
        }
        match &mut self.payload {
            FormPayload::Suspension(f) => f,
            _ => unreachable!(),
        }
    }

    /// Load a draft from a TOML file, or start a fresh one if the file is
    /// missing or unreadable.
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> ActionData {
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!(
                    "Draft load failed from {:?}: {}. Starting a fresh draft.",
                    path.as_ref(),
                    e
                );
                ActionData::default()
            }),
            Err(_) => ActionData::default(),
        }
    }

    /// Persist the draft to a TOML file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_core_field() {
        let mut data = ActionData::default();
        data.apply(Field::StudentName("خالد".into()));
        data.apply(Field::Grade("5/1".into()));
        assert_eq!(data.student_name, "خالد");
        assert_eq!(data.grade, "5/1");
    }

    #[test]
    fn test_apply_checkbox_coercion() {
        let field = Field::parse("reason_lateness", "true").unwrap();
        assert_eq!(field, Field::ReasonLateness(true));

        let field = Field::parse("reason_lateness", "nope").unwrap();
        assert_eq!(field, Field::ReasonLateness(false));
    }

    #[test]
    fn test_parse_unknown_field() {
        assert_eq!(Field::parse("civil_war", "x"), None);
    }

    #[test]
    fn test_parse_deadline() {
        assert_eq!(Field::parse("deadline", "2"), Some(Field::Deadline(Deadline::Two)));
        assert_eq!(Field::parse("deadline", "4"), None);
    }

    #[test]
    fn test_payload_retags_on_foreign_field() {
        let mut data = ActionData::default();
        assert!(data.invitation().is_some());

        data.apply(Field::ArticleNo("5".into()));
        assert_eq!(data.notice().unwrap().article_no, "5");
        assert!(data.invitation().is_none());
    }

    #[test]
    fn test_letter_fields_stay_with_suspension() {
        let mut data = ActionData::default();
        data.retag(FormKind::Annex14Suspension);
        data.apply(Field::Letter1No("77".into()));
        data.apply(Field::ArticleNo("14".into()));

        let payload = data.suspension().unwrap();
        assert_eq!(payload.letter1.number, "77");
        assert_eq!(payload.article_no, "14");
    }

    #[test]
    fn test_retag_keeps_same_family() {
        let mut data = ActionData::default();
        data.retag(FormKind::Annex4Alert);
        data.apply(Field::ArticleNo("5".into()));

        // Annex 4 → Annex 5 stays in the notice family
        data.retag(FormKind::Annex5Warning);
        assert_eq!(data.notice().unwrap().article_no, "5");

        // Leaving the family resets the payload
        data.retag(FormKind::InvitationGeneral);
        assert!(data.notice().is_none());
    }

    #[test]
    fn test_deadline_single_choice() {
        let mut data = ActionData::default();
        data.apply(Field::Deadline(Deadline::Three));
        assert_eq!(data.invitation().unwrap().deadline, Deadline::Three);
        data.apply(Field::Deadline(Deadline::One));
        assert_eq!(data.invitation().unwrap().deadline, Deadline::One);
    }

    #[test]
    fn test_draft_toml_round_trip() {
        let mut data = ActionData::default();
        data.student_name = "أحمد علي".into();
        data.reasons.lateness = true;
        data.reasons.lateness_dates = "2026-02-01، 2026-02-03".into();
        data.retag(FormKind::Annex5Warning);
        data.apply(Field::Letter1No("12".into()));

        let toml_text = toml::to_string_pretty(&data).unwrap();
        let back: ActionData = toml::from_str(&toml_text).unwrap();
        assert_eq!(back, data);
    }
}
