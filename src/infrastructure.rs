//! Infrastructure layer: HTTP transport, HTML parsing, seed and dataset I/O
//!
//! Everything that touches the network, the filesystem or raw markup lives
//! here. The application layer only sees the [`PageTransport`] seam and the
//! typed results.

pub mod config; // Configuration structures and first-run handling
pub mod dataset_writer;
pub mod errors;
pub mod fetcher; // Content-type aware article fetching
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod parsing; // Listing page parsing
pub mod parsing_error;
pub mod seed_loader;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager};
pub use dataset_writer::{DatasetWriter, write_dataset};
pub use errors::{FetchError, SeedLoadError, WriteError};
pub use fetcher::ContentFetcher;
pub use http_client::{HttpClient, PageTransport, RawResponse};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{ListingParser, ListingSelectors, ParseContext, ParsingError, ParsingResult};
pub use seed_loader::load_entities;
