use docanchor_core::{TextFragment, Vertex};
use serde::Serialize;

use crate::util::{normalize, round2, sequence_ratio};

/// The winning fragment for one lookup, carrying the similarity ratio that
/// won (rounded to two decimals).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentMatch {
    pub text: String,
    pub bounding_box: Vec<Vertex>,
    pub page: u32,
    pub confidence: f64,
}

/// Finds the single best-matching fragment for a target string.
///
/// Pure over its inputs; one O(F) scan per lookup, no indexing or
/// pre-filtering. Field and fragment counts are small per document (single
/// digits to low hundreds), which keeps the O(V·F) document cost acceptable.
pub struct Locator {
    threshold: f64,
}

impl Locator {
    pub fn new(threshold: f64) -> Self {
        Locator { threshold }
    }

    /// Scan the whole universe keeping the strictly-highest ratio seen so far
    /// (first-seen wins ties). A match is returned only when the best ratio
    /// exceeds the threshold.
    ///
    /// Targets that are empty, or normalize to empty, are rejected without
    /// scanning.
    pub fn locate(&self, target: &str, fragments: &[TextFragment]) -> Option<FragmentMatch> {
        let target_norm = normalize(target);
        if target_norm.is_empty() {
            return None;
        }

        let mut best: Option<&TextFragment> = None;
        let mut best_ratio = 0.0;
        for fragment in fragments {
            let ratio = sequence_ratio(&target_norm, &normalize(&fragment.text));
            if ratio > best_ratio {
                best_ratio = ratio;
                best = Some(fragment);
            }
        }

        let fragment = best.filter(|_| best_ratio > self.threshold)?;
        Some(FragmentMatch {
            text: fragment.text.clone(),
            bounding_box: fragment.bounding_box.clone(),
            page: fragment.page.unwrap_or(1),
            confidence: round2(best_ratio),
        })
    }
}
