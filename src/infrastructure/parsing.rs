//! HTML parsing infrastructure for listing pages
//!
//! Parsing with configurable selectors and per-row error
//! reporting.

pub mod config;
pub mod context;
pub mod listing_parser;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::{CompiledSelectors, ListingSelectors};
pub use context::ParseContext;
pub use listing_parser::{ListingPage, ListingParser, ListingRow};
