//! Report entries extracted from listing rows
//!
//! A [`ReportEntry`] is built once per listing row and hydrated with the body
//! of the article it links to. Serialization follows the published document
//! layout: field order is fixed and the entity label lands under the field
//! name of the kind that produced it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use super::entity::EntityKind;

/// Fetched article body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportContent {
    /// Decoded HTML page
    Text(String),
    /// Raw document bytes (PDF or generic binary download)
    Binary { media_type: String, data: Vec<u8> },
}

impl ReportContent {
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary { data, .. } => data.len(),
        }
    }
}

/// Document shape of a body: HTML stays a JSON string, bytes become an
/// object, so the two can never be confused on read-back
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ContentRepr<'a> {
    Text(Cow<'a, str>),
    Binary {
        media_type: Cow<'a, str>,
        base64: String,
    },
}

impl Serialize for ReportContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Text(text) => ContentRepr::Text(Cow::Borrowed(text)),
            Self::Binary { media_type, data } => ContentRepr::Binary {
                media_type: Cow::Borrowed(media_type),
                base64: STANDARD.encode(data),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReportContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ContentRepr::deserialize(deserializer)? {
            ContentRepr::Text(text) => Ok(Self::Text(text.into_owned())),
            ContentRepr::Binary { media_type, base64 } => STANDARD
                .decode(base64.as_bytes())
                .map(|data| Self::Binary {
                    media_type: media_type.into_owned(),
                    data,
                })
                .map_err(|e| D::Error::custom(format!("invalid base64 content: {e}"))),
        }
    }
}

/// One report row from an entity's listing page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawReportEntry")]
pub struct ReportEntry {
    pub title: Option<String>,
    pub url: String,
    pub date: Option<String>,
    pub organization: Option<String>,
    pub author: Option<String>,
    pub cve_ids: Option<BTreeSet<String>>,
    pub content: Option<ReportContent>,
    /// Seed list the entry was scraped for; selects the output field name
    pub kind: EntityKind,
    /// Associated entity label from the row, or the seed name when the row has none
    pub entity_name: String,
}

impl Serialize for ReportEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReportEntry", 8)?;
        state.serialize_field("Title", &self.title)?;
        state.serialize_field("URL", &self.url)?;
        state.serialize_field("Date", &self.date)?;
        state.serialize_field("Organization", &self.organization)?;
        state.serialize_field("Author", &self.author)?;
        state.serialize_field("CVE IDs", &self.cve_ids)?;
        state.serialize_field("Content", &self.content)?;
        state.serialize_field(self.kind.profile().output_field, &self.entity_name)?;
        state.end()
    }
}

/// Wire shape of a report object; the kind field is captured by `labels`
#[derive(Deserialize)]
struct RawReportEntry {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Organization")]
    organization: Option<String>,
    #[serde(rename = "Author")]
    author: Option<String>,
    #[serde(rename = "CVE IDs")]
    cve_ids: Option<BTreeSet<String>>,
    #[serde(rename = "Content")]
    content: Option<ReportContent>,
    #[serde(flatten)]
    labels: BTreeMap<String, Option<String>>,
}

impl TryFrom<RawReportEntry> for ReportEntry {
    type Error = String;

    fn try_from(raw: RawReportEntry) -> Result<Self, Self::Error> {
        let mut kinds = raw
            .labels
            .into_iter()
            .filter_map(|(field, value)| EntityKind::from_output_field(&field).map(|kind| (kind, value)));

        let (kind, entity_name) = match (kinds.next(), kinds.next()) {
            (Some((kind, Some(name))), None) => (kind, name),
            (Some((kind, None)), None) => {
                return Err(format!(
                    "report '{}' has a null '{}' label",
                    raw.url,
                    kind.profile().output_field
                ));
            }
            (None, _) => return Err(format!("report '{}' has no entity label", raw.url)),
            (Some(_), Some(_)) => {
                return Err(format!("report '{}' carries more than one entity label", raw.url));
            }
        };

        Ok(Self {
            title: raw.title,
            url: raw.url,
            date: raw.date,
            organization: raw.organization,
            author: raw.author,
            cve_ids: raw.cve_ids,
            content: raw.content,
            kind,
            entity_name,
        })
    }
}
