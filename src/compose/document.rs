//! The renderable document tree.
//!
//! The composer emits this structure; renderers and tests consume it. The
//! tree is plain data: it derives `PartialEq` so composer determinism can be
//! asserted structurally.

use serde::{Deserialize, Serialize};

/// A fully composed, printable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable id of the document kind ("unknown" for the placeholder)
    pub form_id: String,

    /// Human-readable document title (also used for export filenames)
    pub title: String,

    /// Ordered sections, top to bottom
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(form_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }
}

/// One block of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Section {
    /// Letterhead: school identity lines, optional logo, optional annex
    /// number and reference fields
    Letterhead(Letterhead),

    /// Centered, underlined document heading
    Heading(String),

    /// Body text of inline spans
    Paragraph(Vec<Span>),

    /// Checkbox rows with conditional detail text
    ReasonRows(Vec<ReasonRow>),

    /// Mutually exclusive or independent check choices
    Choices(Choices),

    /// Free-text narrative, or dotted blank lines when empty
    Narrative(Narrative),

    /// Framed notice lines
    NoticeBox(Vec<String>),

    /// Signature columns (official signatures and the school stamp)
    Signatures(Vec<Signatory>),

    /// Labeled fill-in rows (recipient block, pledge signature rows)
    LabeledRows(Vec<LabeledField>),

    /// Distribution note at the very bottom
    CopyTo(String),
}

/// Letterhead contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Letterhead {
    /// School identity lines, top to bottom
    pub lines: Vec<String>,

    /// Ministry logo payload when configured; absent renders as empty space
    pub logo: Option<String>,

    /// Annex number, for annex forms only
    pub annex_no: Option<String>,

    /// Reference fields shown opposite the identity lines
    pub refs: Vec<LabeledField>,
}

/// An inline fragment of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Span {
    /// Fixed template text
    Text(String),

    /// Data-bound value; rendered as a dotted blank when empty
    Field(String),

    /// Line break inside the paragraph
    Break,
}

impl Span {
    pub fn text(s: impl Into<String>) -> Span {
        Span::Text(s.into())
    }

    pub fn field(s: impl Into<String>) -> Span {
        Span::Field(s.into())
    }
}

/// A reason row: check mark, label and conditional detail text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonRow {
    pub checked: bool,
    pub label: String,
    /// Detail text; empty unless the row is checked
    pub detail: String,
}

/// A group of check choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choices {
    pub mark: ChoiceMark,
    pub items: Vec<Choice>,
}

/// Visual style of a choice mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceMark {
    /// Filled/hollow squares (deadline boxes)
    Square,
    /// Parenthesized check marks (pledge commitments)
    Parens,
}

/// One checkable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub checked: bool,
    pub label: String,
}

/// Narrative block contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    /// The narrative text; blank lines are rendered instead when empty
    pub text: String,

    /// Dotted lines to render when the text is empty
    pub blank_lines: usize,
}

/// One signature column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signatory {
    /// Role caption; empty for the stamp column
    pub title: String,

    /// Signatory name, when printed under the caption
    pub name: String,

    /// Signature or stamp image payload when configured
    pub image: Option<String>,
}

/// A labeled fill-in field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledField {
    pub label: String,
    /// Rendered as a dotted blank when empty
    pub value: String,
}

impl LabeledField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
