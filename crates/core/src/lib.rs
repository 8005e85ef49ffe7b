pub mod config;
pub mod document;
pub mod record;

pub use config::{Config, ConfigError, GeminiConfig, ReconcileConfig};
pub use document::{
    FieldText, LocatedDocument, ReferenceDocument, ReferenceTable, TextFragment, Vertex,
};
pub use record::{MatchResult, NamedEntity, ReconciledRecord, ReconciledTable, TABLE_CELL_FIELD};
