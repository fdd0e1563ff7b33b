//! Domain module - entities, report entries and the harvested dataset
//!
//! Plain data types with no I/O. Everything the pipeline produces is
//! expressed in these types before it is written out.

pub mod cve;
pub mod dataset;
pub mod entity;
pub mod report;

pub use cve::extract_cve_ids;
pub use dataset::{Dataset, HarvestSummary};
pub use entity::{Entity, EntityKind, KindProfile};
pub use report::{ReportContent, ReportEntry};
