//! Listing extractor
//!
//! One scrape of one entity: fetch the listing page, parse its report rows,
//! hydrate each row with its article body, in page order. Actors and
//! families share this code; the kind only selects the URL path and the
//! output field.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::{Entity, ReportEntry};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::errors::FetchError;
use crate::infrastructure::fetcher::ContentFetcher;
use crate::infrastructure::http_client::PageTransport;
use crate::infrastructure::parsing::{ListingParser, ListingRow, ParseContext, ParsingError};

/// Result of scraping one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOutcome {
    pub entries: Vec<ReportEntry>,
    /// Rows dropped for a missing or unusable article URL
    pub skipped_rows: Vec<ParsingError>,
    /// Entries whose article body could not be fetched
    pub content_failures: usize,
}

pub struct ListingExtractor {
    transport: Arc<dyn PageTransport>,
    fetcher: ContentFetcher,
    parser: ListingParser,
    base_url: String,
    listing_timeout: Duration,
    article_timeout: Duration,
}

impl ListingExtractor {
    pub fn new(transport: Arc<dyn PageTransport>, config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: ContentFetcher::new(Arc::clone(&transport)),
            transport,
            parser: ListingParser::with_config(&config.source.listing_selectors)?,
            base_url: config.source.base_url.trim_end_matches('/').to_string(),
            listing_timeout: Duration::from_secs(config.http.listing_timeout_seconds),
            article_timeout: Duration::from_secs(config.http.article_timeout_seconds),
        })
    }

    /// `<base>/actor/<name>` or `<base>/details/<name>`, spaces as underscores
    pub fn listing_url(&self, entity: &Entity) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            entity.kind.profile().listing_path,
            entity.slug()
        )
    }

    /// Scrape one entity's listing.
    ///
    /// `Err` means the listing page itself was unavailable. Row and article
    /// failures are absorbed into the outcome.
    pub async fn scrape_listing(&self, entity: &Entity) -> Result<ListingOutcome, FetchError> {
        let listing_url = self.listing_url(entity);
        info!("🔍 Scraping {} from {}", entity, listing_url);

        let response = self.transport.get(&listing_url, self.listing_timeout).await?;
        let context = ParseContext::new(entity.clone(), response.url.clone());

        // The parsed document is dropped here, before any further await
        let page = self.parser.parse_listing(&response.text(), &context);

        let mut outcome = ListingOutcome {
            entries: Vec::with_capacity(page.rows.len()),
            skipped_rows: page.skipped,
            content_failures: 0,
        };

        for row in page.rows {
            debug!("Row {} of {}: {}", row.position, entity, row.article_url);
            let content = self
                .fetcher
                .fetch_or_none(&row.article_url, self.article_timeout)
                .await;
            if content.is_none() {
                outcome.content_failures += 1;
            }
            outcome.entries.push(build_entry(entity, row, content));
        }

        Ok(outcome)
    }
}

fn build_entry(
    entity: &Entity,
    row: ListingRow,
    content: Option<crate::domain::ReportContent>,
) -> ReportEntry {
    ReportEntry {
        title: row.title,
        url: row.article_url,
        date: row.date,
        organization: row.organization,
        author: row.author,
        cve_ids: row.cve_ids,
        content,
        kind: entity.kind,
        entity_name: row.related_entity.unwrap_or_else(|| entity.name.clone()),
    }
}
