use serde::{Deserialize, Serialize};

use crate::document::Vertex;

/// Label carried by matched table cells in place of a field name.
pub const TABLE_CELL_FIELD: &str = "table_cell";

/// One reference field annotated with its best-guess location.
///
/// `field` is the field name for personal details, [`TABLE_CELL_FIELD`] for
/// matched table cells, and absent for empty and unmatched cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub value: String,
    #[serde(default)]
    pub bounding_box: Vec<Vertex>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub confidence: f64,
}

impl MatchResult {
    /// Placeholder for a reference field no fragment matched. The field still
    /// appears in the output exactly once.
    pub fn unmatched(field: impl Into<String>, value: impl Into<String>) -> Self {
        MatchResult {
            field: Some(field.into()),
            value: value.into(),
            bounding_box: Vec::new(),
            page: None,
            confidence: 0.0,
        }
    }

    /// Fixed placeholder for an empty table cell.
    pub fn empty_cell() -> Self {
        MatchResult {
            field: None,
            value: String::new(),
            bounding_box: Vec::new(),
            page: None,
            confidence: 0.0,
        }
    }
}

/// A personal-detail match relabeled as an entity. Derived by projection —
/// there is no second matching pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub entity_type: String,
    pub value: String,
    pub bounding_box: Vec<Vertex>,
    pub page: Option<u32>,
    pub confidence: f64,
}

impl NamedEntity {
    pub fn from_match(m: &MatchResult) -> Self {
        NamedEntity {
            entity_type: m.field.clone().unwrap_or_default(),
            value: m.value.clone(),
            bounding_box: m.bounding_box.clone(),
            page: m.page,
            confidence: m.confidence,
        }
    }
}

/// One reconciled table: the reference headers plus located cells, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<MatchResult>>,
}

/// The merged record for one document. Struct field order here is the key
/// order of the serialized output file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciledRecord {
    pub personal_details: Vec<MatchResult>,
    pub key_value_pairs: Vec<MatchResult>,
    pub named_entities: Vec<NamedEntity>,
    pub tables: Vec<ReconciledTable>,
    /// Reference fields whose value was not a single string. Kept for
    /// reporting; not part of the serialized output.
    #[serde(skip)]
    pub skipped_fields: Vec<String>,
}
