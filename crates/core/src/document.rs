use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One corner of a bounding polygon, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

/// One OCR-located text span.
///
/// The fragment list for a document is the fixed universe searched during
/// reconciliation — fragments are never modified, only referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<Vertex>,
    /// 1-based page number. Some producers omit it; defaults to 1 at use.
    #[serde(default)]
    pub page: Option<u32>,
    /// Recognition confidence reported by the OCR producer, in 0.0–1.0.
    #[serde(default, alias = "confidence")]
    pub source_confidence: Option<f64>,
}

/// A reference field value as it appears in input JSON: sometimes a plain
/// string, sometimes wrapped in `{"value": ...}`, sometimes something else
/// entirely. The shape is resolved here, once, at ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldText {
    Plain(String),
    Nested { value: String },
    Other(Value),
}

impl FieldText {
    /// The single-string rendering of this value, if it has one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldText::Plain(s) => Some(s),
            FieldText::Nested { value } => Some(value),
            FieldText::Other(_) => None,
        }
    }
}

/// One table from the reference extraction. Cells share the dynamic value
/// shape of personal details.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceTable {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<FieldText>>,
}

/// The coordinate-free reference extraction for one document.
///
/// `personal_details` keeps the field order of the input file — output
/// ordering guarantees depend on it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ReferenceDocument {
    #[serde(default, rename = "personalDetails")]
    pub personal_details: IndexMap<String, FieldText>,
    #[serde(default)]
    pub tables: Vec<ReferenceTable>,
}

/// The located extraction: every OCR fragment with its coordinates.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LocatedDocument {
    #[serde(default)]
    pub text_coordinates: Vec<TextFragment>,
}
