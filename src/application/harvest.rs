//! End-to-end harvest run: scrape every seed, then write the documents

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::orchestrator::HarvestOrchestrator;
use crate::domain::{Dataset, Entity, HarvestSummary};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dataset_writer::DatasetWriter;
use crate::infrastructure::http_client::PageTransport;

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct HarvestRun {
    pub dataset: Dataset,
    pub summary: HarvestSummary,
    /// Documents written, aggregate first
    pub written: Vec<PathBuf>,
}

/// Scrape `entities` over `transport` and persist the result.
///
/// Scrape failures never fail the run; only an invalid configuration or a
/// failed write does.
pub async fn harvest(
    config: &AppConfig,
    transport: Arc<dyn PageTransport>,
    entities: &[Entity],
) -> anyhow::Result<HarvestRun> {
    let orchestrator = HarvestOrchestrator::new(transport, config)?;
    let dataset = orchestrator.run(entities).await;
    let summary = dataset.summary();

    let writer = DatasetWriter::new(config.output.clone());
    let written = writer.write_all(&dataset, entities).await?;
    info!("📁 Wrote {} documents", written.len());

    Ok(HarvestRun {
        dataset,
        summary,
        written,
    })
}
