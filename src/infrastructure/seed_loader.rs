//! Seed list loading
//!
//! Seed lists are JSON arrays of objects. The name lives under the field the
//! entity kind's profile names (`"Threat Actor"` or `"Name"`). Objects without
//! a usable name are skipped; a file that is missing or not an array of
//! objects is fatal.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use super::errors::SeedLoadError;
use crate::domain::{Entity, EntityKind};

/// Parse seed JSON into entities of `kind`, in file order
pub fn parse_seed_list(
    json: &str,
    kind: EntityKind,
    origin: &Path,
) -> Result<Vec<Entity>, SeedLoadError> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_str(json).map_err(|source| SeedLoadError::Malformed {
            path: origin.to_path_buf(),
            source,
        })?;

    let field = kind.profile().seed_field;
    let mut entities = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        // Blank names are skipped; anything else is kept exactly as supplied
        match record.get(field).and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => entities.push(Entity::new(kind, name)),
            _ => warn!(
                "Skipping {} seed entry {} in {:?}: missing '{}' field",
                kind, position, origin, field
            ),
        }
    }

    Ok(entities)
}

/// Read and parse one seed file
pub async fn load_seed_list(path: &Path, kind: EntityKind) -> Result<Vec<Entity>, SeedLoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let entities = parse_seed_list(&content, kind, path)?;
    info!("📋 Loaded {} {} seeds from {:?}", entities.len(), kind, path);
    Ok(entities)
}

/// Load actors then families; repeated `(kind, name)` pairs are dropped
pub async fn load_entities(actors_path: &Path, families_path: &Path) -> Result<Vec<Entity>, SeedLoadError> {
    let mut entities = load_seed_list(actors_path, EntityKind::Actor).await?;
    entities.extend(load_seed_list(families_path, EntityKind::MalwareFamily).await?);
    Ok(dedupe_entities(entities))
}

/// Keep the first occurrence of each entity, preserving order
pub fn dedupe_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::with_capacity(entities.len());
    entities
        .into_iter()
        .filter(|entity| {
            let first = seen.insert(entity.clone());
            if !first {
                warn!("Dropping duplicate seed entry for {}", entity);
            }
            first
        })
        .collect()
}
