//! Keyed harvest result
//!
//! [`Dataset`] is an insertion-ordered map from entity name to that entity's
//! reports. Key order is the seed order; it is preserved through
//! serialization and deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::entity::{Entity, EntityKind};
use super::report::ReportEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    reports: IndexMap<String, Vec<ReportEntry>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `reports` under `name`.
    ///
    /// A name seen before keeps its original position; the new reports are
    /// appended after the existing ones.
    pub fn insert(&mut self, name: impl Into<String>, reports: Vec<ReportEntry>) {
        self.reports.entry(name.into()).or_default().extend(reports);
    }

    pub fn get(&self, name: &str) -> Option<&[ReportEntry]> {
        self.reports.get(name).map(Vec::as_slice)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.reports.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reports.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ReportEntry])> {
        self.reports
            .iter()
            .map(|(name, reports)| (name.as_str(), reports.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Per-kind view used for the dashboard's detail files.
    ///
    /// Keys are the `kind` entities of `seeds` in seed order; each maps to
    /// only the reports scraped for that kind.
    pub fn subset_for_kind(&self, kind: EntityKind, seeds: &[Entity]) -> Self {
        let mut subset = Self::new();
        for entity in seeds.iter().filter(|e| e.kind == kind) {
            if subset.contains_key(&entity.name) {
                continue;
            }
            let reports = self
                .get(&entity.name)
                .unwrap_or_default()
                .iter()
                .filter(|report| report.kind == kind)
                .cloned()
                .collect();
            subset.insert(entity.name.clone(), reports);
        }
        subset
    }

    pub fn summary(&self) -> HarvestSummary {
        let mut summary = HarvestSummary {
            entities: self.len(),
            ..HarvestSummary::default()
        };
        let mut cves = BTreeSet::new();

        for (_, reports) in self.iter() {
            if reports.is_empty() {
                summary.entities_without_reports += 1;
            }
            summary.total_reports += reports.len();
            for report in reports {
                match &report.content {
                    Some(content) if content.is_binary() => {
                        summary.reports_with_content += 1;
                        summary.binary_reports += 1;
                    }
                    Some(_) => summary.reports_with_content += 1,
                    None => {}
                }
                if let Some(ids) = &report.cve_ids {
                    cves.extend(ids.iter().cloned());
                }
            }
        }

        summary.distinct_cve_ids = cves.len();
        summary
    }
}

/// Counts describing one harvest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HarvestSummary {
    pub entities: usize,
    pub entities_without_reports: usize,
    pub total_reports: usize,
    pub reports_with_content: usize,
    pub binary_reports: usize,
    pub distinct_cve_ids: usize,
}

impl fmt::Display for HarvestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities ({} without reports), {} reports ({} with content, {} binary), {} distinct CVE IDs",
            self.entities,
            self.entities_without_reports,
            self.total_reports,
            self.reports_with_content,
            self.binary_reports,
            self.distinct_cve_ids
        )
    }
}
