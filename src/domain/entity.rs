//! Tracked entities and the per-kind lookup table
//!
//! Threat actors and malware families go through one scrape pipeline; every
//! place where the two differ reads from [`KindProfile`] instead of branching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which seed list an entity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Actor,
    MalwareFamily,
}

/// Static per-kind settings: seed field, listing path, output field, detail file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    /// Field holding the entity name in the seed list
    pub seed_field: &'static str,
    /// Path segment of the listing page (`<base>/<path>/<name>`)
    pub listing_path: &'static str,
    /// Field carrying the entity label in each serialized report object
    pub output_field: &'static str,
    /// File name of the per-kind detail document read by the dashboard
    pub detail_file: &'static str,
}

const ACTOR_PROFILE: KindProfile = KindProfile {
    seed_field: "Threat Actor",
    listing_path: "actor",
    output_field: "Threat Actor",
    detail_file: "threat_actor_data.json",
};

const MALWARE_FAMILY_PROFILE: KindProfile = KindProfile {
    seed_field: "Name",
    listing_path: "details",
    output_field: "Malware Family",
    detail_file: "malware_family_data.json",
};

impl EntityKind {
    /// All kinds in seed-loading order
    pub const ALL: [Self; 2] = [Self::Actor, Self::MalwareFamily];

    pub const fn profile(self) -> &'static KindProfile {
        match self {
            Self::Actor => &ACTOR_PROFILE,
            Self::MalwareFamily => &MALWARE_FAMILY_PROFILE,
        }
    }

    /// Resolve a kind from its serialized output field name
    pub fn from_output_field(field: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.profile().output_field == field)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => write!(f, "threat actor"),
            Self::MalwareFamily => write!(f, "malware family"),
        }
    }
}

/// A named threat actor or malware family loaded from a seed list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn actor(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Actor, name)
    }

    pub fn malware_family(name: impl Into<String>) -> Self {
        Self::new(EntityKind::MalwareFamily, name)
    }

    /// Name as it appears in listing URLs (spaces become underscores)
    pub fn slug(&self) -> String {
        self.name.replace(' ', "_")
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}
