//! Harvest orchestrator
//!
//! Runs one listing scrape per seed entity concurrently on the current task
//! and reassembles the results in seed order, whatever order they finish in.

use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::listing_extractor::{ListingExtractor, ListingOutcome};
use crate::domain::{Dataset, Entity};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::errors::FetchError;
use crate::infrastructure::http_client::PageTransport;

pub struct HarvestOrchestrator {
    extractor: ListingExtractor,
}

impl HarvestOrchestrator {
    pub fn new(transport: Arc<dyn PageTransport>, config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            extractor: ListingExtractor::new(transport, config)?,
        })
    }

    /// Scrape every entity and build the dataset.
    ///
    /// Every entity gets a key, in seed order; an unavailable listing yields
    /// an empty report list and does not affect the other entities. A seed
    /// repeated in `entities` is scraped once.
    pub async fn run(&self, entities: &[Entity]) -> Dataset {
        let started = Instant::now();
        info!("🚀 Starting harvest of {} entities", entities.len());

        // Each task is tagged with its entity; repeated seeds share one scrape
        let mut launched = HashSet::with_capacity(entities.len());
        let mut tasks: FuturesUnordered<_> = entities
            .iter()
            .filter(|entity| launched.insert(*entity))
            .map(|entity| async move { (entity, self.extractor.scrape_listing(entity).await) })
            .collect();

        let mut results: HashMap<&Entity, Result<ListingOutcome, FetchError>> =
            HashMap::with_capacity(entities.len());
        while let Some((entity, result)) = tasks.next().await {
            results.insert(entity, result);
        }
        drop(tasks);

        // Reassemble in seed order, independent of completion order
        let mut dataset = Dataset::new();
        for entity in entities {
            let reports = match results.remove(entity) {
                Some(Ok(outcome)) => {
                    info!(
                        "✅ {}: {} reports ({} rows skipped, {} without content)",
                        entity,
                        outcome.entries.len(),
                        outcome.skipped_rows.len(),
                        outcome.content_failures
                    );
                    outcome.entries
                }
                Some(Err(e)) => {
                    warn!("❌ Listing unavailable for {}: {}", entity, e);
                    Vec::new()
                }
                // Repeated seed, already reported under its first occurrence
                None => Vec::new(),
            };
            dataset.insert(entity.name.clone(), reports);
        }

        info!(
            "🏁 Harvest finished in {:.1}s: {}",
            started.elapsed().as_secs_f64(),
            dataset.summary()
        );
        dataset
    }
}
