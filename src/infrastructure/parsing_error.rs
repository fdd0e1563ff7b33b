//! Row extraction error types
//!
//! Every variant describes one listing row that could not be turned into a
//! report entry. These never abort an entity; the parser records them and
//! moves on to the next row.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Row {row}: required field '{field}' not found")]
    RequiredFieldMissing { row: usize, field: String },

    #[error("Row {row}: URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        row: usize,
        url: String,
        reason: String,
    },
}

impl ParsingError {
    pub fn required_field_missing(row: usize, field: &str) -> Self {
        Self::RequiredFieldMissing {
            row,
            field: field.to_string(),
        }
    }

    pub fn url_resolution_failed(row: usize, url: &str, reason: impl Into<String>) -> Self {
        Self::UrlResolutionFailed {
            row,
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_row() {
        let err = ParsingError::required_field_missing(3, "data-href");
        assert_eq!(err.to_string(), "Row 3: required field 'data-href' not found");

        let err = ParsingError::url_resolution_failed(1, "http://[::1", "invalid IPv6");
        assert!(err.to_string().starts_with("Row 1: URL resolution failed"));
        assert!(err.to_string().contains("invalid IPv6"));
    }
}
