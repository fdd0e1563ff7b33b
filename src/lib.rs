//! Threat-intel report harvester
//!
//! Scrapes the report listings of threat actors and malware families from a
//! Malpedia-style knowledge base, fetches each referenced article, and writes
//! the collected reports as JSON keyed by entity name.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

// Re-export the types most callers need
pub use application::{HarvestOrchestrator, HarvestRun, harvest};
pub use domain::{Dataset, Entity, EntityKind, HarvestSummary, ReportContent, ReportEntry};
pub use infrastructure::config::AppConfig;
