//! Section builders.
//!
//! Each [`Part`] names one section of a document; [`build`] maps it to a
//! [`Section`] from the current draft and branding. All fixed template text
//! lives here. Builders never fail: missing data becomes blank fields.

use crate::compose::document::{
    Choice, ChoiceMark, Choices, LabeledField, Letterhead, Narrative, ReasonRow, Section,
    Signatory, Span,
};
use crate::models::{ActionData, Deadline, SchoolConfig, SchoolSettings};

/// Identifies one buildable section of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// Invitation letterhead: identity lines + logo
    Letterhead,
    /// Annex letterhead: identity lines, logo, annex number and references.
    /// `with_year` adds the academic-year reference (annex 6).
    AnnexHead { no: u8, with_year: bool },
    /// Centered document heading
    Heading(&'static str),
    /// Invitation date line
    InviteDate,
    /// Summons date line with a blank weekday slot
    SummonsDate,
    /// Invitation addressee lines (student + grade)
    Addressee,
    /// Annex addressee lines (student + grade, formal register)
    AnnexAddressee,
    /// Invitation salutation
    Salutation,
    /// Annex salutation
    AnnexSalutation,
    /// Summons salutation addressed to the guardian by name
    GuardianSalutation,
    /// Invitation body paragraph
    InvitationBody,
    /// Attendance deadline tri-choice
    DeadlineChoices,
    /// Teacher and subject line (teacher invitation)
    TeacherSubject,
    /// Summons subject line
    SummonsSubject,
    /// Summons body with blank day/time slots
    SummonsBody,
    /// Summons closing warning
    SummonsWarning,
    /// Summons thanks closing
    ThanksClosing,
    /// "Report to the student-affairs committee" note
    CommitteeNote,
    /// Annex 3 article clause
    AdviceClause,
    /// Annex 4 letter + article clause
    AlertClause,
    /// Annex 5 two-letter + article clause
    WarningClause,
    /// Annex 14 two-letter + article + duration clause
    SuspensionClause,
    /// The three reason rows
    ReasonRows,
    /// Annex 3 follow-up line
    AdviceFollowup,
    /// Annex 4 follow-up line
    AlertFollowup,
    /// Courtesy closing line
    Courtesy,
    /// Seven-day review box (annex 5)
    ReviewBoxWeek,
    /// During-suspension review box (annex 14)
    ReviewBoxSuspension,
    /// Behavior narrative text (annex 14, when present)
    NarrativeText,
    /// Blank narrative lines (annex 14, when no text was entered)
    NarrativeBlanks,
    /// Pledge attendance paragraph
    PledgeAttendance,
    /// Pledge commitments intro line
    PledgeIntro,
    /// The three check-only pledge commitments
    PledgeCommitments,
    /// Pledge enforcement paragraph
    PledgeEnforcement,
    /// Student/guardian signature rows (pledge)
    PledgeSignRows,
    /// Official signature columns (annex forms)
    AnnexSignatures,
    /// Invitation footer: social worker, stamp, principal
    InvitationFooter,
    /// Receipt acknowledgment rows
    RecipientBlock,
    /// Distribution note
    CopyToNote,
    /// Guardian acknowledgment slip (summons)
    AcknowledgmentSlip,
}

/// Build one section from the draft and branding. Pure.
pub fn build(
    part: Part,
    data: &ActionData,
    settings: &SchoolSettings,
    school: &SchoolConfig,
) -> Section {
    match part {
        Part::Letterhead => Section::Letterhead(Letterhead {
            lines: school.letterhead_lines(),
            logo: settings.ministry_logo.clone(),
            annex_no: None,
            refs: Vec::new(),
        }),

        Part::AnnexHead { no, with_year } => {
            let mut refs = vec![
                LabeledField::new("الرقم :", &data.document_number),
                LabeledField::new("التاريخ :", &data.incident_date),
            ];
            if with_year {
                refs.push(LabeledField::new("العام الدراسي :", &data.academic_year));
            }
            Section::Letterhead(Letterhead {
                lines: school.letterhead_lines(),
                logo: settings.ministry_logo.clone(),
                annex_no: Some(no.to_string()),
                refs,
            })
        }

        Part::Heading(text) => Section::Heading(text.to_string()),

        Part::InviteDate => Section::Paragraph(vec![
            Span::text("تاريخ الدعوة : "),
            Span::field(&data.incident_date),
        ]),

        Part::SummonsDate => Section::Paragraph(vec![
            Span::text("التاريخ : "),
            Span::field(&data.incident_date),
            Span::text("    الموافق : "),
            Span::field(""),
        ]),

        Part::Addressee => Section::Paragraph(vec![
            Span::text("الفاضل ولي أمر الطالب : "),
            Span::field(&data.student_name),
            Span::Break,
            Span::text("المقيد بالصف : "),
            Span::field(&data.grade),
        ]),

        Part::AnnexAddressee => Section::Paragraph(vec![
            Span::text("الفاضل ولي أمر الطالب / الطالبة : "),
            Span::field(&data.student_name),
            Span::text(" المسجل / المسجلة"),
            Span::Break,
            Span::text("بالصف : "),
            Span::field(&data.grade),
            Span::text("    المحترم"),
        ]),

        Part::Salutation => Section::Paragraph(vec![Span::text(
            "السلام عليكم ورحمة الله وبركاته",
        )]),

        Part::AnnexSalutation => Section::Paragraph(vec![Span::text(
            "السلام عليكم ورحمة الله وبركاته .. وبعد ...",
        )]),

        Part::GuardianSalutation => Section::Paragraph(vec![
            Span::text("الفاضل ولي أمر الطالب / "),
            Span::field(&data.guardian_name),
            Span::text(" المحترم"),
            Span::Break,
            Span::text("السلام عليكم ورحمة الله وبركاته ،،،"),
        ]),

        Part::InvitationBody => Section::Paragraph(vec![Span::text(
            "نظراً لأهمية التعاون بين المدرسة وولي الأمر فيما يخدم مصلحة الطالب ، ويحقق له النجاح ، \
             ونأمل منكم الحضور إلى المدرسة لبحث بعض الأمور المتعلقة بابنكم ، ولنا في حضوركم أمل بهدف \
             التعاون بين البيت والمدرسة لتحقيق الرسالة التربوية الهادفة التي نسعى إليها ، وتأمل المدرسة \
             حضوركم في أقرب فرصة ممكنة لديكم ، بحيث لا تتجاوز :",
        )]),

        Part::DeadlineChoices => {
            let selected = data
                .invitation()
                .map(|f| f.deadline)
                .unwrap_or_default();
            Section::Choices(Choices {
                mark: ChoiceMark::Square,
                items: [Deadline::One, Deadline::Two, Deadline::Three]
                    .into_iter()
                    .map(|d| Choice {
                        checked: d == selected,
                        label: d.label().to_string(),
                    })
                    .collect(),
            })
        }

        Part::TeacherSubject => {
            let inv = data.invitation().cloned().unwrap_or_default();
            Section::Paragraph(vec![
                Span::text("المادة : "),
                Span::field(&inv.subject_name),
                Span::text("    المعلم : "),
                Span::field(&inv.teacher_name),
            ])
        }

        Part::SummonsSubject => Section::Paragraph(vec![Span::text(
            "الموضوع : طلب حضور لمناقشة مستوى الطالب / سلوك الطالب",
        )]),

        Part::SummonsBody => Section::Paragraph(vec![
            Span::text(
                "نهديكم أطيب التحيات، ونظراً لأهمية التواصل المستمر بين البيت والمدرسة لما فيه \
                 مصلحة الطالب ومستقبله الدراسي والسلوكي.",
            ),
            Span::Break,
            Span::text(
                "عليه، يرجى التكرم بالحضور إلى مبنى المدرسة لمقابلة لجنة شؤون الطلاب وذلك يوم ",
            ),
            Span::field(""),
            Span::text(" الموافق "),
            Span::field(""),
            Span::text(" في تمام الساعة "),
            Span::field(""),
            Span::text(" صباحاً."),
        ]),

        Part::SummonsWarning => Section::Paragraph(vec![Span::text(
            "وذلك لمناقشة بعض المخالفات السلوكية الصادرة من الطالب واتخاذ الإجراءات التربوية اللازمة.",
        )]),

        Part::ThanksClosing => Section::Paragraph(vec![Span::text(
            "شاكرين لكم حسن تعاونكم واهتمامكم ،،،",
        )]),

        Part::CommitteeNote => Section::Paragraph(vec![Span::text(
            "ومراجعة لجنة شؤون الطلاب",
        )]),

        Part::AdviceClause => {
            let notice = data.notice().cloned().unwrap_or_default();
            Section::Paragraph(vec![
                Span::text("عملاً بالمادة رقم ( "),
                Span::field(&notice.article_no),
                Span::text(
                    " ) من لائحة شؤون الطلاب بالمدارس الحكومية ، نفيدكم بأن إدارة المدرسة قد قامت \
                     بتقديم النصح للطالب ، وذلك بسبب :",
                ),
            ])
        }

        Part::AlertClause => {
            let notice = data.notice().cloned().unwrap_or_default();
            Section::Paragraph(vec![
                Span::text("إلحاقاً برسالتنا رقم ( "),
                Span::field(&notice.letter1.number),
                Span::text(" ) بتاريخ : "),
                Span::field(&notice.letter1.date),
                Span::text(" ، بشأن "),
                Span::field(&notice.letter1.subject),
                Span::text(" ، وعملاً بالمادة ( "),
                Span::field(&notice.article_no),
                Span::text(
                    " ) من لائحة شؤون الطلاب، نفيدكم بأن لجنة شؤون الطلاب قد قامت بتنبيه الطالب، \
                     وذلك بسبب :",
                ),
            ])
        }

        Part::WarningClause => {
            let notice = data.notice().cloned().unwrap_or_default();
            Section::Paragraph(vec![
                Span::text("إلحاقاً برسالتنا رقم ( "),
                Span::field(&notice.letter1.number),
                Span::text(" ) بتاريخ : "),
                Span::field(&notice.letter1.date),
                Span::text(" ، وبرسالتنا رقم ( "),
                Span::field(&notice.letter2.number),
                Span::text(" ) بتاريخ : "),
                Span::field(&notice.letter2.date),
                Span::text(" بشأن"),
                Span::Break,
                Span::text("وعملاً بالمادة ( "),
                Span::field(&notice.article_no),
                Span::text(
                    " ) من لائحة شؤون الطلاب، نفيدكم بأن إدارة المدرسة قد أنذرت الطالب المذكور، \
                     وذلك بسبب :",
                ),
            ])
        }

        Part::SuspensionClause => {
            let susp = data.suspension().cloned().unwrap_or_default();
            Section::Paragraph(vec![
                Span::text("إلحاقاً برسالتنا رقم ( "),
                Span::field(&susp.letter1.number),
                Span::text(" ) بتاريخ : "),
                Span::field(&susp.letter1.date),
                Span::text(" ، بشأن "),
                Span::field(&susp.letter1.subject),
                Span::Break,
                Span::text("وبرسالتنا رقم ( "),
                Span::field(&susp.letter2.number),
                Span::text(" ) بتاريخ : "),
                Span::field(&susp.letter2.date),
                Span::text(" بشأن "),
                Span::field(&susp.letter2.subject),
                Span::Break,
                Span::text("وعملاً بالمادة ( "),
                Span::field(&susp.article_no),
                Span::text(
                    " ) من لائحة شؤون الطلاب، نفيدكم بأن لجنة شؤون الطلاب قد قررت فصل الطالب \
                     المذكور مؤقتاً لمدة ( ",
                ),
                Span::field(&susp.suspension_days),
                Span::text(" ) أيام ، وذلك بسبب إتيان السلوكيات الآتية :"),
            ])
        }

        Part::ReasonRows => {
            let r = &data.reasons;
            Section::ReasonRows(vec![
                reason_row(r.lateness, "التأخر الصباحي :", &r.lateness_dates),
                reason_row(r.absence, "الغياب بدون عذر :", &r.absence_dates),
                reason_row(r.behavior, "إتيان السلوكيات الآتية :", &r.behavior_details),
            ])
        }

        Part::AdviceFollowup => Section::Paragraph(vec![Span::text(
            "وقد قامت إدارة المدرسة بتوجيه الطالب شفوياً وإرشاده إلى عدم تكرار التأخير / الغياب / السلوك.",
        )]),

        Part::AlertFollowup => Section::Paragraph(vec![Span::text(
            "وقد قامت إدارة المدرسة بتوجيه الطالب كتابةً وإحاطته علماً بنتائج المخالفة.",
        )]),

        Part::Courtesy => Section::Paragraph(vec![Span::text(
            "وتفضلوا بقبول فائق الاحترام والتقدير ....",
        )]),

        Part::ReviewBoxWeek => Section::NoticeBox(vec![
            "عليه ، يرجى التكرم بمراجعة إدارة المدرسة في مدة لا تتجاوز ( 7 ) سبعة أيام من تاريخه"
                .to_string(),
            "لمناقشة موضوع الطالب واستكمال بقية الاجراءات.".to_string(),
        ]),

        Part::ReviewBoxSuspension => Section::NoticeBox(vec![
            "عليه ، يرجى التكرم بمراجعة إدارة المدرسة خلال مدة الفصل، لمناقشة موضوع الطالب واستكمال بقية الاجراءات."
                .to_string(),
        ]),

        Part::NarrativeText => Section::Narrative(Narrative {
            text: data.reasons.behavior_details.clone(),
            blank_lines: 0,
        }),

        Part::NarrativeBlanks => Section::Narrative(Narrative {
            text: String::new(),
            blank_lines: 3,
        }),

        Part::PledgeAttendance => Section::Paragraph(vec![
            Span::text("حضر إلى المدرسة الفاضل / الفاضلة : "),
            Span::field(&data.guardian_name),
            Span::text(" الرقم المدني ( "),
            Span::field(&data.guardian_civil_id),
            Span::text(" )"),
            Span::Break,
            Span::text("ولي أمر الطالب / الطالبة : "),
            Span::field(&data.student_name),
            Span::text(" المسجل بالصف : "),
            Span::field(&data.grade),
            Span::Break,
            Span::text("يوم : "),
            Span::field(""),
            Span::text(" الموافق : "),
            Span::field(&data.incident_date),
            Span::text(" ، لمناقشة موضوع الإنذار الموجه إلى ابنه."),
        ]),

        Part::PledgeIntro => Section::Paragraph(vec![Span::text(
            "وقد تعهد الطالب وولي أمره بـ :",
        )]),

        Part::PledgeCommitments => {
            let r = &data.reasons;
            Section::Choices(Choices {
                mark: ChoiceMark::Parens,
                items: vec![
                    Choice {
                        checked: r.lateness,
                        label: "عدم التأخر عن موعد بدء اليوم الدراسي بدون عذر مقبول ."
                            .to_string(),
                    },
                    Choice {
                        checked: r.absence,
                        label: "عدم الغياب عن المدرسة بدون عذر مقبول .".to_string(),
                    },
                    Choice {
                        checked: r.behavior,
                        label: "عدم تكرار السلوكيات المنسوبة إليه، والالتزام بأنظمة وقواعد الانضباط السلوكي."
                            .to_string(),
                    },
                ],
            })
        }

        Part::PledgeEnforcement => Section::Paragraph(vec![Span::text(
            "وأنه في حال عدم التزامه ستقوم إدارة المدرسة باتخاذ الإجراء الذي تراه مناسباً وفق لائحة شؤون الطلاب.",
        )]),

        Part::PledgeSignRows => Section::LabeledRows(vec![
            LabeledField::new("توقيع الطالب :", ""),
            LabeledField::new("توقيع ولي الأمر :", ""),
            LabeledField::new("رقم الهاتف :", &data.guardian_phone),
            LabeledField::new("الرقم المدني :", &data.guardian_civil_id),
            LabeledField::new("التاريخ :", &data.incident_date),
        ]),

        Part::AnnexSignatures => Section::Signatures(vec![
            Signatory {
                title: "عضو لجنة شؤون الطلاب".to_string(),
                name: String::new(),
                image: settings.committee_head_signature.clone(),
            },
            Signatory {
                title: String::new(),
                name: String::new(),
                image: settings.school_stamp.clone(),
            },
            Signatory {
                title: "يعتمد مدير المدرسة".to_string(),
                name: String::new(),
                image: settings.principal_signature.clone(),
            },
        ]),

        Part::InvitationFooter => Section::Signatures(vec![
            Signatory {
                title: "أخصائي شؤون الطلاب".to_string(),
                name: data.social_worker_name.clone(),
                image: None,
            },
            Signatory {
                title: String::new(),
                name: String::new(),
                image: settings.school_stamp.clone(),
            },
            Signatory {
                title: data.admin_name.clone(),
                name: String::new(),
                image: settings.principal_signature.clone(),
            },
        ]),

        Part::RecipientBlock => Section::LabeledRows(vec![
            LabeledField::new("اسم المتسلم :", &data.recipient.name),
            LabeledField::new("صلته بالطالب :", &data.recipient.relation),
            LabeledField::new("الرقم المدني :", &data.recipient.civil_id),
            LabeledField::new("رقم الهاتف :", &data.recipient.phone),
            LabeledField::new("التاريخ :", ""),
            LabeledField::new("التوقيع :", ""),
        ]),

        Part::CopyToNote => Section::CopyTo("نسخة إلى : ملف الطالب".to_string()),

        Part::AcknowledgmentSlip => Section::Paragraph(vec![
            Span::text("إقرار ولي الأمر (يتم تعبئته وإعادته للمدرسة)"),
            Span::Break,
            Span::text("أنا ولي أمر الطالب "),
            Span::field(""),
            Span::text(" أقر باستلامي الدعوة وسأقوم بالحضور في الموعد المحدد."),
            Span::Break,
            Span::text("التوقيع : "),
            Span::field(""),
        ]),
    }
}

fn reason_row(checked: bool, label: &str, detail: &str) -> ReasonRow {
    ReasonRow {
        checked,
        label: label.to_string(),
        // Detail text only accompanies a checked reason
        detail: if checked { detail.to_string() } else { String::new() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;

    fn ctx() -> (SchoolSettings, SchoolConfig) {
        (SchoolSettings::default(), SchoolConfig::default())
    }

    #[test]
    fn test_reason_detail_dropped_when_unchecked() {
        let (settings, school) = ctx();
        let mut data = ActionData::default();
        data.reasons.lateness_dates = "الأحد والاثنين".into();

        let Section::ReasonRows(rows) = build(Part::ReasonRows, &data, &settings, &school)
        else {
            panic!("expected reason rows");
        };
        assert!(!rows[0].checked);
        assert_eq!(rows[0].detail, "");

        data.reasons.lateness = true;
        let Section::ReasonRows(rows) = build(Part::ReasonRows, &data, &settings, &school)
        else {
            panic!("expected reason rows");
        };
        assert!(rows[0].checked);
        assert_eq!(rows[0].detail, "الأحد والاثنين");
    }

    #[test]
    fn test_deadline_choices_single_selection() {
        let (settings, school) = ctx();
        let mut data = ActionData::default();
        data.apply(Field::Deadline(Deadline::Two));

        let Section::Choices(choices) = build(Part::DeadlineChoices, &data, &settings, &school)
        else {
            panic!("expected choices");
        };
        assert_eq!(choices.mark, ChoiceMark::Square);
        let checked: Vec<bool> = choices.items.iter().map(|c| c.checked).collect();
        assert_eq!(checked, vec![false, true, false]);
    }

    #[test]
    fn test_clause_renders_blanks_for_foreign_payload() {
        let (settings, school) = ctx();
        // Draft still carries an invitation payload; the warning clause must
        // come out with empty fields, not panic.
        let data = ActionData::default();
        let Section::Paragraph(spans) = build(Part::WarningClause, &data, &settings, &school)
        else {
            panic!("expected paragraph");
        };
        assert!(spans.iter().any(|s| matches!(s, Span::Field(v) if v.is_empty())));
    }

    #[test]
    fn test_annex_head_year_only_for_pledge() {
        let (settings, school) = ctx();
        let data = ActionData::default();

        let Section::Letterhead(head) =
            build(Part::AnnexHead { no: 6, with_year: true }, &data, &settings, &school)
        else {
            panic!("expected letterhead");
        };
        assert_eq!(head.annex_no.as_deref(), Some("6"));
        assert_eq!(head.refs.len(), 3);

        let Section::Letterhead(head) =
            build(Part::AnnexHead { no: 5, with_year: false }, &data, &settings, &school)
        else {
            panic!("expected letterhead");
        };
        assert_eq!(head.refs.len(), 2);
    }

    #[test]
    fn test_missing_logo_renders_as_absent() {
        let (settings, school) = ctx();
        let data = ActionData::default();
        let Section::Letterhead(head) = build(Part::Letterhead, &data, &settings, &school)
        else {
            panic!("expected letterhead");
        };
        assert!(head.logo.is_none());
        assert_eq!(head.lines.len(), 4);
    }
}
