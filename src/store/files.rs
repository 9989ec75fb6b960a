use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

use super::UsageCounts;

/// On-disk shape of the base responses file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFile {
    #[serde(default)]
    pub responses: Vec<String>,
    #[serde(default)]
    pub response_counts: UsageCounts,
}

/// On-disk shape of the read-only extra seed file.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ExtraFile {
    #[serde(default)]
    pub extra_responses: Vec<String>,
}

/// Result of a best-effort read. Callers decide how to degrade.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Loaded(T),
    NotFound,
    Invalid(anyhow::Error),
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> LoadOutcome<T> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return LoadOutcome::NotFound,
        Err(error) => {
            return LoadOutcome::Invalid(
                anyhow::Error::new(error)
                    .context(format!("Failed to read {}", path.display())),
            );
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => LoadOutcome::Loaded(value),
        Err(error) => LoadOutcome::Invalid(
            anyhow::Error::new(error).context(format!("Failed to parse {}", path.display())),
        ),
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let serialized = serde_json::to_vec(value).context("Failed to serialize responses")?;
    std::fs::write(path, serialized)
        .with_context(|| format!("Failed to write {}", path.display()))
}
