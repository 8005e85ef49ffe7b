use docanchor_core::{
    FieldText, LocatedDocument, MatchResult, NamedEntity, ReconcileConfig, ReconciledRecord,
    ReconciledTable, ReferenceDocument, TextFragment, TABLE_CELL_FIELD,
};
use tracing::warn;

use crate::locator::{FragmentMatch, Locator};
use crate::refine::{NoRefine, RefineBackend};

/// Walks every reference field and attaches location + confidence via the
/// locator, optionally letting a generative backend adjust each match.
///
/// A stateless batch transform: one pass, no retries, no partial-progress
/// checkpointing.
pub struct Reconciler<R: RefineBackend> {
    config: ReconcileConfig,
    locator: Locator,
    refiner: R,
}

impl Reconciler<NoRefine> {
    /// Reconciler without a refinement backend.
    pub fn new(config: ReconcileConfig) -> Self {
        Reconciler::with_refiner(config, NoRefine)
    }
}

impl<R: RefineBackend> Reconciler<R> {
    pub fn with_refiner(config: ReconcileConfig, refiner: R) -> Self {
        let locator = Locator::new(config.similarity_threshold);
        Reconciler { config, locator, refiner }
    }

    /// Merge one reference document against its fragment universe.
    ///
    /// Every string-valued reference field yields exactly one output entry,
    /// in reference-document order; non-string values are logged and recorded
    /// as skipped, never aborting the batch.
    pub async fn reconcile(
        &self,
        reference: &ReferenceDocument,
        located: &LocatedDocument,
    ) -> ReconciledRecord {
        let fragments = &located.text_coordinates;
        let mut record = ReconciledRecord::default();

        for (name, value) in &reference.personal_details {
            let Some(text) = value.as_str() else {
                warn!(field = %name, "skipping personal detail with non-string value");
                record.skipped_fields.push(name.clone());
                continue;
            };
            let result = match self.locator.locate(text, fragments) {
                Some(hit) => self.refined_or_local(name, text, &hit).await,
                None => MatchResult::unmatched(name, text),
            };
            record.key_value_pairs.push(result.clone());
            record.personal_details.push(result);
        }

        for table in &reference.tables {
            let mut rows = Vec::with_capacity(table.rows.len());
            for row in &table.rows {
                let mut cells = Vec::with_capacity(row.len());
                for cell in row {
                    cells.push(self.reconcile_cell(cell, fragments).await);
                }
                rows.push(cells);
            }
            record.tables.push(ReconciledTable { headers: table.headers.clone(), rows });
        }

        // Named entities are a relabeling of the personal details, not a
        // second matching pass.
        record.named_entities =
            record.personal_details.iter().map(NamedEntity::from_match).collect();

        record
    }

    /// Empty cells get the fixed placeholder without touching the locator;
    /// everything else is matched like a personal detail.
    async fn reconcile_cell(&self, cell: &FieldText, fragments: &[TextFragment]) -> MatchResult {
        let text = cell.as_str().unwrap_or_default();
        if text.is_empty() {
            if let FieldText::Other(v) = cell {
                if !v.is_null() {
                    warn!("replacing non-string table cell with empty placeholder");
                }
            }
            return MatchResult::empty_cell();
        }

        match self.locator.locate(text, fragments) {
            Some(hit) => self.refined_or_local(TABLE_CELL_FIELD, text, &hit).await,
            None => MatchResult {
                field: None,
                value: text.to_string(),
                bounding_box: Vec::new(),
                page: None,
                confidence: 0.0,
            },
        }
    }

    /// Refinement is advisory: any error keeps the local match, and nothing
    /// propagates to the caller.
    async fn refined_or_local(&self, field: &str, value: &str, hit: &FragmentMatch) -> MatchResult {
        let local = MatchResult {
            field: Some(field.to_string()),
            value: value.to_string(),
            bounding_box: hit.bounding_box.clone(),
            page: Some(hit.page),
            confidence: hit.confidence,
        };

        if !self.config.enable_refinement {
            return local;
        }

        match self.refiner.refine(field, value, hit).await {
            Ok(refined) => refined,
            Err(err) => {
                warn!(field = %field, error = %err, "refinement failed; keeping local match");
                local
            }
        }
    }
}
