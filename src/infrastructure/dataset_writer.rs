//! Dataset document writer
//!
//! Writes the aggregate document and the per-kind detail files as pretty
//! JSON (four-space indent, non-ASCII kept verbatim). Each document is
//! written to a sibling temp file and renamed into place, so a failed write
//! never leaves a truncated document at the destination.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::config::OutputConfig;
use super::errors::WriteError;
use crate::domain::{Dataset, Entity, EntityKind};

const INDENT: &[u8] = b"    ";

/// Serialize `value` as four-space indented JSON
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Write one dataset document to `destination`
pub async fn write_dataset(dataset: &Dataset, destination: &Path) -> Result<(), WriteError> {
    let bytes = to_pretty_json(dataset).map_err(|source| WriteError::Serialize {
        path: destination.to_path_buf(),
        source,
    })?;

    let io_error = |source| WriteError::Io {
        path: destination.to_path_buf(),
        source,
    };

    if let Some(dir) = destination.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).await.map_err(io_error)?;
        }
    }

    let mut staging = destination.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, &bytes).await.map_err(io_error)?;
    if let Err(source) = fs::rename(&staging, destination).await {
        let _ = fs::remove_file(&staging).await;
        return Err(io_error(source));
    }

    info!(
        "💾 Wrote {} entities ({} bytes) to {:?}",
        dataset.len(),
        bytes.len(),
        destination
    );
    Ok(())
}

/// Writes the aggregate document and, if enabled, the per-kind detail files
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    output: OutputConfig,
}

impl DatasetWriter {
    pub const fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.aggregate_file)
    }

    pub fn detail_path(&self, kind: EntityKind) -> PathBuf {
        self.output.directory.join(kind.profile().detail_file)
    }

    /// Write every configured document; returns the paths written
    pub async fn write_all(&self, dataset: &Dataset, seeds: &[Entity]) -> Result<Vec<PathBuf>, WriteError> {
        let mut written = Vec::new();

        let aggregate = self.aggregate_path();
        write_dataset(dataset, &aggregate).await?;
        written.push(aggregate);

        if self.output.write_detail_files {
            for kind in EntityKind::ALL {
                let path = self.detail_path(kind);
                write_dataset(&dataset.subset_for_kind(kind, seeds), &path).await?;
                written.push(path);
            }
        }

        Ok(written)
    }
}
