//! Parsing context for listing extraction

use crate::domain::Entity;

/// Context information for parsing one listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Entity whose listing is being parsed
    pub entity: Entity,

    /// URL the listing was fetched from; relative article links resolve against it
    pub listing_url: String,
}

impl ParseContext {
    pub fn new(entity: Entity, listing_url: impl Into<String>) -> Self {
        Self {
            entity,
            listing_url: listing_url.into(),
        }
    }
}
