use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use docanchor_core::Config;
use docanchor_recon::{GeminiRefiner, Reconciler};

mod io;

/// Reference extraction: field/value pairs, no coordinates.
const REFERENCE_PATH: &str = "document_extraction_results.json";
/// Located extraction: OCR fragments with coordinates.
const LOCATED_PATH: &str = "exp_statement_output.json";
/// Merged output record.
const OUTPUT_PATH: &str = "final_comparison.json";
/// Optional configuration file; defaults apply when absent.
const CONFIG_PATH: &str = "docanchor.toml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load_or_default(Path::new(CONFIG_PATH))
        .with_context(|| format!("reading {CONFIG_PATH}"))?;

    let reference = io::load_reference(Path::new(REFERENCE_PATH))
        .with_context(|| format!("reading {REFERENCE_PATH}"))?;
    let located = io::load_located(Path::new(LOCATED_PATH))
        .with_context(|| format!("reading {LOCATED_PATH}"))?;

    info!(
        fields = reference.personal_details.len(),
        tables = reference.tables.len(),
        fragments = located.text_coordinates.len(),
        refinement = config.reconcile.enable_refinement,
        "reconciling"
    );

    let refiner = GeminiRefiner::from_env(config.gemini.model.clone());
    let reconciler = Reconciler::with_refiner(config.reconcile, refiner);
    let record = reconciler.reconcile(&reference, &located).await;

    if !record.skipped_fields.is_empty() {
        info!(
            skipped = record.skipped_fields.len(),
            "some personal details had non-string values"
        );
    }

    io::save_record(Path::new(OUTPUT_PATH), &record)
        .with_context(|| format!("writing {OUTPUT_PATH}"))?;
    info!("reconciled record saved to {OUTPUT_PATH}");

    Ok(())
}
