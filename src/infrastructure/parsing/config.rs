//! Parsing configuration for listing-page extraction
//!
//! Centralized CSS selectors for report rows. Each field takes a list of
//! selectors tried in order, so a markup change can be absorbed by adding a
//! fallback in the config file.

use anyhow::{Result, anyhow};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// CSS selectors for listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Selectors for clickable report rows
    pub report_row: Vec<String>,

    /// Row attribute carrying the article URL
    pub article_url_attribute: String,

    pub title: Vec<String>,
    pub date: Vec<String>,
    pub organization: Vec<String>,
    pub author: Vec<String>,

    /// Link naming the associated actor or family
    pub related_entity: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            report_row: vec!["tr.clickable-row.clickable-row-newtab".to_string()],
            article_url_attribute: "data-href".to_string(),
            title: vec!["span.title.mono-font".to_string()],
            date: vec!["span.date.mono-font".to_string()],
            organization: vec!["span.organization.mono-font".to_string()],
            author: vec!["span.authors.mono-font".to_string()],
            related_entity: vec!["a[data-family_name]".to_string()],
        }
    }
}

/// Selectors compiled once and shared by every parse
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub report_row: Vec<Selector>,
    pub article_url_attribute: String,
    pub title: Vec<Selector>,
    pub date: Vec<Selector>,
    pub organization: Vec<Selector>,
    pub author: Vec<Selector>,
    pub related_entity: Vec<Selector>,
}

impl ListingSelectors {
    pub fn compile(&self) -> Result<CompiledSelectors> {
        if self.article_url_attribute.trim().is_empty() {
            return Err(anyhow!("article_url_attribute must not be empty"));
        }

        Ok(CompiledSelectors {
            report_row: compile_selectors("report_row", &self.report_row)?,
            article_url_attribute: self.article_url_attribute.clone(),
            title: compile_selectors("title", &self.title)?,
            date: compile_selectors("date", &self.date)?,
            organization: compile_selectors("organization", &self.organization)?,
            author: compile_selectors("author", &self.author)?,
            related_entity: compile_selectors("related_entity", &self.related_entity)?,
        })
    }
}

/// Compile multiple selector strings, skipping invalid ones
fn compile_selectors(field: &str, selector_strings: &[String]) -> Result<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile {} selector '{}': {}", field, selector_str, e);
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        return Err(anyhow!(
            "No valid {} selectors compiled. Errors: {}",
            field,
            errors.join(", ")
        ));
    }

    if !errors.is_empty() {
        debug!("Some {} selectors failed to compile: {}", field, errors.join(", "));
    }

    Ok(selectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        let compiled = ListingSelectors::default().compile().unwrap();
        assert_eq!(compiled.report_row.len(), 1);
        assert_eq!(compiled.article_url_attribute, "data-href");
    }

    #[test]
    fn test_invalid_fallback_is_skipped() {
        let selectors = ListingSelectors {
            title: vec!["span[".to_string(), "span.title".to_string()],
            ..ListingSelectors::default()
        };
        let compiled = selectors.compile().unwrap();
        assert_eq!(compiled.title.len(), 1);
    }

    #[test]
    fn test_all_invalid_is_an_error() {
        let selectors = ListingSelectors {
            date: vec!["::::".to_string()],
            ..ListingSelectors::default()
        };
        assert!(selectors.compile().is_err());

        let selectors = ListingSelectors {
            article_url_attribute: String::new(),
            ..ListingSelectors::default()
        };
        assert!(selectors.compile().is_err());
    }
}
