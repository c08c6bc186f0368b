// src/render.rs

//! Plain-text rendering of composed documents.
//!
//! Produces the printable text handed to the host print pipeline. Empty
//! fields come out as dotted blanks, never as errors; image payloads are
//! left to the print layer and contribute no text.

use crate::compose::{ChoiceMark, Document, LabeledField, Section, Span};

/// Dotted blank standing in for a missing value.
const BLANK: &str = "............";

/// Horizontal rule width used for headings and notice boxes.
const RULE_WIDTH: usize = 60;

/// Render a document tree to printable text.
pub fn to_text(doc: &Document) -> String {
    let mut out = String::new();
    for section in &doc.sections {
        render_section(&mut out, section);
        out.push('\n');
    }
    out
}

fn render_section(out: &mut String, section: &Section) {
    match section {
        Section::Letterhead(head) => {
            for line in &head.lines {
                out.push_str(line);
                out.push('\n');
            }
            if let Some(no) = &head.annex_no {
                out.push_str(&format!("ملحق رقم ( {} )\n", no));
            }
            for field in &head.refs {
                render_labeled(out, field);
            }
        }

        Section::Heading(text) => {
            out.push_str(text);
            out.push('\n');
            out.push_str(&"─".repeat(RULE_WIDTH));
            out.push('\n');
        }

        Section::Paragraph(spans) => {
            for span in spans {
                match span {
                    Span::Text(text) => out.push_str(text),
                    Span::Field(value) => out.push_str(&blank_or(value)),
                    Span::Break => out.push('\n'),
                }
            }
            out.push('\n');
        }

        Section::ReasonRows(rows) => {
            for row in rows {
                out.push_str(&format!(
                    "{} {} {}\n",
                    check_mark(row.checked),
                    row.label,
                    blank_or(&row.detail)
                ));
            }
        }

        Section::Choices(choices) => match choices.mark {
            ChoiceMark::Square => {
                let line: Vec<String> = choices
                    .items
                    .iter()
                    .map(|c| format!("{} {}", square_mark(c.checked), c.label))
                    .collect();
                out.push_str(&line.join("    "));
                out.push('\n');
            }
            ChoiceMark::Parens => {
                for choice in &choices.items {
                    out.push_str(&format!("{} {}\n", check_mark(choice.checked), choice.label));
                }
            }
        },

        Section::Narrative(narrative) => {
            if narrative.text.is_empty() {
                for _ in 0..narrative.blank_lines {
                    out.push_str(&".".repeat(RULE_WIDTH));
                    out.push('\n');
                }
            } else {
                out.push_str(&narrative.text);
                out.push('\n');
            }
        }

        Section::NoticeBox(lines) => {
            out.push_str(&"─".repeat(RULE_WIDTH));
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&"─".repeat(RULE_WIDTH));
            out.push('\n');
        }

        Section::Signatures(signatories) => {
            for signatory in signatories {
                // The stamp column has no caption and no text to print
                if signatory.title.is_empty() {
                    continue;
                }
                out.push_str(&format!(
                    "{} : {}\n",
                    signatory.title,
                    blank_or(&signatory.name)
                ));
            }
        }

        Section::LabeledRows(rows) => {
            for field in rows {
                render_labeled(out, field);
            }
        }

        Section::CopyTo(note) => {
            out.push_str(note);
            out.push('\n');
        }
    }
}

fn render_labeled(out: &mut String, field: &LabeledField) {
    out.push_str(&format!("{} {}\n", field.label, blank_or(&field.value)));
}

fn blank_or(value: &str) -> String {
    if value.is_empty() {
        BLANK.to_string()
    } else {
        value.to_string()
    }
}

fn check_mark(checked: bool) -> &'static str {
    if checked { "( ✔ )" } else { "(   )" }
}

fn square_mark(checked: bool) -> &'static str {
    if checked { "■" } else { "□" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose;
    use crate::models::{ActionData, Field, FormKind, SchoolConfig, SchoolSettings};

    fn render(kind: FormKind, data: &ActionData) -> String {
        let doc = compose::compose(
            kind,
            data,
            &SchoolSettings::default(),
            &SchoolConfig::default(),
        );
        to_text(&doc)
    }

    #[test]
    fn test_empty_fields_render_as_blanks() {
        let text = render(FormKind::InvitationGeneral, &ActionData::default());
        assert!(text.contains(BLANK));
        assert!(text.contains("دعوة ولي أمر لحضور المدرسة"));
    }

    #[test]
    fn test_bound_values_appear() {
        let mut data = ActionData::default();
        data.student_name = "أحمد علي".into();
        data.grade = "5/1".into();

        let text = render(FormKind::Annex4Alert, &data);
        assert!(text.contains("أحمد علي"));
        assert!(text.contains("5/1"));
    }

    #[test]
    fn test_deadline_square_is_filled() {
        let mut data = ActionData::default();
        data.apply(Field::Deadline(crate::models::Deadline::Two));

        let text = render(FormKind::InvitationGeneral, &data);
        assert!(text.contains("■ يومين"));
        assert!(text.contains("□ يوماً واحداً"));
    }

    #[test]
    fn test_checked_reason_renders_mark_and_detail() {
        let mut data = ActionData::default();
        data.retag(FormKind::Annex3Advice);
        data.reasons.lateness = true;
        data.reasons.lateness_dates = "الأحد 2026-02-01".into();

        let text = render(FormKind::Annex3Advice, &data);
        assert!(text.contains("( ✔ ) التأخر الصباحي :"));
        assert!(text.contains("الأحد 2026-02-01"));
        assert!(text.contains("(   ) الغياب بدون عذر :"));
    }

    #[test]
    fn test_empty_narrative_renders_dotted_lines() {
        let mut data = ActionData::default();
        data.retag(FormKind::Annex14Suspension);

        let text = render(FormKind::Annex14Suspension, &data);
        let dotted = ".".repeat(60);
        assert_eq!(text.matches(&dotted).count(), 3);
    }

    #[test]
    fn test_placeholder_renders() {
        let doc = compose::not_found();
        let text = to_text(&doc);
        assert!(text.contains("Document Not Found"));
    }
}
