//! Document composition.
//!
//! Pure mapping from (document kind, draft, branding) to a renderable
//! [`Document`] tree. No side effects, no I/O: the same inputs always yield
//! a structurally identical tree.

pub mod document;
pub mod layout;
pub mod sections;

pub use document::{
    Choice, ChoiceMark, Choices, Document, LabeledField, Letterhead, Narrative, ReasonRow,
    Section, Signatory, Span,
};

use crate::models::{ActionData, FormKind, SchoolConfig, SchoolSettings};

/// Form id used by the placeholder document.
pub const UNKNOWN_FORM_ID: &str = "unknown";

/// Compose a document of the given kind from the draft and branding.
pub fn compose(
    kind: FormKind,
    data: &ActionData,
    settings: &SchoolSettings,
    school: &SchoolConfig,
) -> Document {
    let mut doc = Document::new(kind.id(), kind.title());
    for entry in layout::layout(kind) {
        if (entry.visible)(data) {
            doc.sections
                .push(sections::build(entry.part, data, settings, school));
        }
    }
    doc
}

/// Compose by stable form id. An unrecognized id yields the "document not
/// found" placeholder — a terminal display state, not an error.
pub fn compose_by_id(
    id: &str,
    data: &ActionData,
    settings: &SchoolSettings,
    school: &SchoolConfig,
) -> Document {
    match FormKind::from_id(id) {
        Some(kind) => compose(kind, data, settings, school),
        None => not_found(),
    }
}

/// The placeholder shown for an unrecognized document kind.
pub fn not_found() -> Document {
    let mut doc = Document::new(UNKNOWN_FORM_ID, "Document Not Found");
    doc.sections.push(Section::Heading("Document Not Found".to_string()));
    doc
}
