//! Declarative per-variant section layouts.
//!
//! Each document kind maps to an ordered table of section descriptors. A
//! descriptor names the section to build and the predicate deciding whether
//! it appears for the current draft. The composer walks the table in order,
//! which keeps every variant testable section by section instead of through
//! nested branching.

use crate::compose::sections::Part;
use crate::models::ActionData;

/// One entry of a variant layout.
#[derive(Clone, Copy)]
pub struct SectionSpec {
    /// Which section to build
    pub part: Part,

    /// Whether the section appears for this draft
    pub visible: fn(&ActionData) -> bool,
}

const fn spec(part: Part) -> SectionSpec {
    SectionSpec {
        part,
        visible: always,
    }
}

const fn spec_if(part: Part, visible: fn(&ActionData) -> bool) -> SectionSpec {
    SectionSpec { part, visible }
}

fn always(_: &ActionData) -> bool {
    true
}

fn has_narrative(data: &ActionData) -> bool {
    !data.reasons.behavior_details.is_empty()
}

fn no_narrative(data: &ActionData) -> bool {
    data.reasons.behavior_details.is_empty()
}

/// Guardian invitation, general.
pub const INVITATION_GENERAL: &[SectionSpec] = &[
    spec(Part::Letterhead),
    spec(Part::Heading("دعوة ولي أمر لحضور المدرسة لأمر يتعلق بالطالب")),
    spec(Part::InviteDate),
    spec(Part::Addressee),
    spec(Part::Salutation),
    spec(Part::InvitationBody),
    spec(Part::DeadlineChoices),
    spec(Part::CommitteeNote),
    spec(Part::InvitationFooter),
];

/// Guardian invitation for a teacher meeting.
pub const INVITATION_TEACHER: &[SectionSpec] = &[
    spec(Part::Letterhead),
    spec(Part::Heading("دعوة ولي أمر لحضور المدرسة لأمر يتعلق بالطالب")),
    spec(Part::InviteDate),
    spec(Part::Addressee),
    spec(Part::Salutation),
    spec(Part::InvitationBody),
    spec(Part::DeadlineChoices),
    spec(Part::TeacherSubject),
    spec(Part::InvitationFooter),
];

/// Guardian summons over a behavioral violation. Static letter body; no
/// data-bound reason section.
pub const INVITATION_SUSPENSION: &[SectionSpec] = &[
    spec(Part::Letterhead),
    spec(Part::Heading("استدعاء ولي أمر")),
    spec(Part::SummonsDate),
    spec(Part::GuardianSalutation),
    spec(Part::SummonsSubject),
    spec(Part::SummonsBody),
    spec(Part::SummonsWarning),
    spec(Part::ThanksClosing),
    spec(Part::InvitationFooter),
    spec(Part::AcknowledgmentSlip),
];

/// Annex 3: notification of advice.
pub const ANNEX_3_ADVICE: &[SectionSpec] = &[
    spec(Part::AnnexHead { no: 3, with_year: false }),
    spec(Part::Heading("استمارة إخطار ولي الأمر بنصح الطالب")),
    spec(Part::AnnexAddressee),
    spec(Part::AnnexSalutation),
    spec(Part::AdviceClause),
    spec(Part::ReasonRows),
    spec(Part::AdviceFollowup),
    spec(Part::Courtesy),
    spec(Part::AnnexSignatures),
    spec(Part::RecipientBlock),
    spec(Part::CopyToNote),
];

/// Annex 4: student alert.
pub const ANNEX_4_ALERT: &[SectionSpec] = &[
    spec(Part::AnnexHead { no: 4, with_year: false }),
    spec(Part::Heading("استمارة تنبيه طالب")),
    spec(Part::AnnexAddressee),
    spec(Part::AnnexSalutation),
    spec(Part::AlertClause),
    spec(Part::ReasonRows),
    spec(Part::AlertFollowup),
    spec(Part::Courtesy),
    spec(Part::AnnexSignatures),
    spec(Part::RecipientBlock),
    spec(Part::CopyToNote),
];

/// Annex 5: student warning.
pub const ANNEX_5_WARNING: &[SectionSpec] = &[
    spec(Part::AnnexHead { no: 5, with_year: false }),
    spec(Part::Heading("استمارة إنذار طالب")),
    spec(Part::AnnexAddressee),
    spec(Part::AnnexSalutation),
    spec(Part::WarningClause),
    spec(Part::ReasonRows),
    spec(Part::ReviewBoxWeek),
    spec(Part::Courtesy),
    spec(Part::AnnexSignatures),
    spec(Part::RecipientBlock),
    spec(Part::CopyToNote),
];

/// Annex 6: student and guardian pledge. Commitments are check-only; no
/// reason detail section exists in this layout.
pub const ANNEX_6_PLEDGE: &[SectionSpec] = &[
    spec(Part::AnnexHead { no: 6, with_year: true }),
    spec(Part::Heading("استمارة تعهد الطالب وولي أمره")),
    spec(Part::PledgeAttendance),
    spec(Part::PledgeIntro),
    spec(Part::PledgeCommitments),
    spec(Part::PledgeEnforcement),
    spec(Part::PledgeSignRows),
    spec(Part::AnnexSignatures),
    spec(Part::RecipientBlock),
    spec(Part::CopyToNote),
];

/// Annex 14: temporary suspension order.
pub const ANNEX_14_SUSPENSION: &[SectionSpec] = &[
    spec(Part::AnnexHead { no: 14, with_year: false }),
    spec(Part::Heading("استمارة فصل مؤقت لطالب")),
    spec(Part::AnnexAddressee),
    spec(Part::AnnexSalutation),
    spec(Part::SuspensionClause),
    spec_if(Part::NarrativeText, has_narrative),
    spec_if(Part::NarrativeBlanks, no_narrative),
    spec(Part::ReviewBoxSuspension),
    spec(Part::Courtesy),
    spec(Part::AnnexSignatures),
    spec(Part::RecipientBlock),
    spec(Part::CopyToNote),
];

/// Layout table for a document kind.
pub fn layout(kind: crate::models::FormKind) -> &'static [SectionSpec] {
    use crate::models::FormKind;
    match kind {
        FormKind::InvitationGeneral => INVITATION_GENERAL,
        FormKind::InvitationTeacher => INVITATION_TEACHER,
        FormKind::InvitationSuspension => INVITATION_SUSPENSION,
        FormKind::Annex3Advice => ANNEX_3_ADVICE,
        FormKind::Annex4Alert => ANNEX_4_ALERT,
        FormKind::Annex5Warning => ANNEX_5_WARNING,
        FormKind::Annex6Pledge => ANNEX_6_PLEDGE,
        FormKind::Annex14Suspension => ANNEX_14_SUSPENSION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormKind;

    #[test]
    fn test_every_kind_has_a_layout() {
        for kind in FormKind::ALL {
            assert!(!layout(kind).is_empty(), "no layout for {:?}", kind);
        }
    }

    #[test]
    fn test_narrative_predicates_are_complementary() {
        let mut data = ActionData::default();
        let text = ANNEX_14_SUSPENSION
            .iter()
            .find(|s| s.part == Part::NarrativeText)
            .unwrap();
        let blanks = ANNEX_14_SUSPENSION
            .iter()
            .find(|s| s.part == Part::NarrativeBlanks)
            .unwrap();

        assert!(!(text.visible)(&data));
        assert!((blanks.visible)(&data));

        data.reasons.behavior_details = "مشاجرة داخل الفصل".into();
        assert!((text.visible)(&data));
        assert!(!(blanks.visible)(&data));
    }

    #[test]
    fn test_pledge_layout_has_no_reason_rows() {
        assert!(
            ANNEX_6_PLEDGE.iter().all(|s| s.part != Part::ReasonRows),
            "pledge must never carry reason detail rows"
        );
    }
}
