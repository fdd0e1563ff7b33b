//! Application layer
//!
//! Drives the harvest: per-entity listing extraction, concurrent
//! orchestration, and the end-to-end run that writes the documents.

pub mod harvest;
pub mod listing_extractor;
pub mod orchestrator;

pub use harvest::{HarvestRun, harvest};
pub use listing_extractor::{ListingExtractor, ListingOutcome};
pub use orchestrator::HarvestOrchestrator;
