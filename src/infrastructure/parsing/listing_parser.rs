//! Listing page parser
//!
//! Turns an entity's listing page into ordered report rows. Optional fields
//! degrade to `None`; a row without a usable article URL is skipped and
//! recorded, and the remaining rows are still returned.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use url::Url;

use super::config::{CompiledSelectors, ListingSelectors};
use super::{ParseContext, ParsingError, ParsingResult};
use crate::domain::extract_cve_ids;

/// One report row as it appears on the listing page, before hydration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Zero-based position among the matched rows
    pub position: usize,
    pub title: Option<String>,
    pub article_url: String,
    pub date: Option<String>,
    pub organization: Option<String>,
    pub author: Option<String>,
    pub related_entity: Option<String>,
    pub cve_ids: Option<BTreeSet<String>>,
}

/// Parse result for one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Extracted rows in page order
    pub rows: Vec<ListingRow>,
    /// Rows that were dropped, with the reason
    pub skipped: Vec<ParsingError>,
}

/// Parser for extracting report rows from listing pages
pub struct ListingParser {
    selectors: CompiledSelectors,
}

impl ListingParser {
    /// Create a parser with the default selectors
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> anyhow::Result<Self> {
        Ok(Self {
            selectors: selectors.compile()?,
        })
    }

    /// Parse raw listing HTML
    pub fn parse_listing(&self, html: &str, context: &ParseContext) -> ListingPage {
        let document = Html::parse_document(html);
        let page = self.extract_page(&document, context);
        debug!(
            "Parsed {} rows ({} skipped) for {}",
            page.rows.len(),
            page.skipped.len(),
            context.entity
        );
        page
    }

    fn extract_page(&self, document: &Html, context: &ParseContext) -> ListingPage {
        let mut page = ListingPage::default();

        // First row selector that matches anything wins
        let row_elements: Vec<ElementRef> = self
            .selectors
            .report_row
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|rows| !rows.is_empty())
            .unwrap_or_default();

        for (position, element) in row_elements.iter().enumerate() {
            match self.extract_row(element, position, context) {
                Ok(row) => page.rows.push(row),
                Err(e) => {
                    warn!("Skipping listing row for {}: {}", context.entity, e);
                    page.skipped.push(e);
                }
            }
        }

        page
    }

    /// Extract one row; only the article URL is mandatory
    fn extract_row(
        &self,
        element: &ElementRef,
        position: usize,
        context: &ParseContext,
    ) -> ParsingResult<ListingRow> {
        let attribute = &self.selectors.article_url_attribute;
        let href = element
            .value()
            .attr(attribute)
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| ParsingError::required_field_missing(position, attribute))?;
        let article_url = resolve_url(href, &context.listing_url, position)?;

        let title = extract_text_with_fallbacks(element, &self.selectors.title);
        let cve_ids = title.as_deref().and_then(extract_cve_ids);

        Ok(ListingRow {
            position,
            article_url,
            cve_ids,
            title,
            date: extract_text_with_fallbacks(element, &self.selectors.date),
            organization: extract_text_with_fallbacks(element, &self.selectors.organization),
            author: extract_text_with_fallbacks(element, &self.selectors.author),
            related_entity: extract_text_with_fallbacks(element, &self.selectors.related_entity),
        })
    }
}

/// Extract text content using multiple selectors as fallbacks
fn extract_text_with_fallbacks(element: &ElementRef, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .find_map(|selector| extract_text_by_selector(element, selector))
}

fn extract_text_by_selector(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Resolve a possibly relative article link against the listing URL
fn resolve_url(href: &str, listing_url: &str, row: usize) -> ParsingResult<String> {
    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(listing_url)
            .and_then(|base| base.join(href))
            .map_err(|e| ParsingError::url_resolution_failed(row, href, e.to_string()))?,
        Err(e) => return Err(ParsingError::url_resolution_failed(row, href, e.to_string())),
    };

    match resolved.scheme() {
        "http" | "https" => Ok(resolved.to_string()),
        other => Err(ParsingError::url_resolution_failed(
            row,
            href,
            format!("unsupported scheme '{}'", other),
        )),
    }
}
