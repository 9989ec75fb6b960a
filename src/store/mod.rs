pub(crate) mod files;

use anyhow::Result;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::generator::Generator;
use files::{BaseFile, ExtraFile, LoadOutcome};

const RESPONSE_MARKER: &str = "Response: ";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No responses available. Add a custom response first.")]
    NoResponses,

    #[error("Malformed generation output (no `Response: ` marker): `{generated}`")]
    MalformedOutput { generated: String },
}

/// How many times each response has been picked. Absent keys read as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageCounts(BTreeMap<String, u64>);

impl UsageCounts {
    pub fn get(&self, response: &str) -> u64 {
        self.0.get(response).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, response: &str) {
        *self.0.entry(response.to_owned()).or_insert(0) += 1;
    }

    pub fn zero(&mut self, response: &str) {
        self.0.insert(response.to_owned(), 0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedResponse {
    pub position: usize,
    pub text: String,
    pub count: u64,
}

pub struct ResponseStore {
    path: PathBuf,
    responses: Vec<String>,
    counts: UsageCounts,
}

impl ResponseStore {
    /// Builds the store from the base file, then overlays the extra seed file.
    /// Neither file is required to exist.
    pub fn load(path: &Path, extra_path: &Path) -> Self {
        let base = match files::read_json::<BaseFile>(path) {
            LoadOutcome::Loaded(base) => base,
            LoadOutcome::NotFound => {
                debug!(path = %path.display(), "no responses file yet, starting empty");
                BaseFile::default()
            }
            LoadOutcome::Invalid(error) => {
                warn!("ignoring unreadable responses file: {error:#}");
                BaseFile::default()
            }
        };

        let mut store = Self {
            path: path.to_path_buf(),
            responses: base.responses,
            counts: base.response_counts,
        };

        match files::read_json::<ExtraFile>(extra_path) {
            LoadOutcome::Loaded(extra) => store.responses.extend(extra.extra_responses),
            LoadOutcome::NotFound => warn!(
                path = %extra_path.display(),
                "could not load additional responses, file not found"
            ),
            LoadOutcome::Invalid(error) => {
                warn!("could not load additional responses: {error:#}")
            }
        }

        store
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn counts(&self) -> &UsageCounts {
        &self.counts
    }

    pub fn add_response(&mut self, text: &str) -> Result<AddOutcome> {
        if text.trim().is_empty() {
            return Ok(AddOutcome::Empty);
        }

        self.responses.push(text.to_owned());
        self.counts.zero(text);
        self.save()?;
        Ok(AddOutcome::Added)
    }

    pub fn remove_response(&mut self, text: &str) -> Result<RemoveOutcome> {
        let Some(position) = self.responses.iter().position(|response| response == text) else {
            return Ok(RemoveOutcome::NotFound);
        };

        self.responses.remove(position);
        self.save()?;
        Ok(RemoveOutcome::Removed)
    }

    pub fn reset_counts(&mut self) -> Result<()> {
        self.counts.clear();
        self.save()
    }

    pub fn list_responses(&self) -> Vec<ListedResponse> {
        self.responses
            .iter()
            .enumerate()
            .map(|(index, text)| ListedResponse {
                position: index + 1,
                text: text.clone(),
                count: self.counts.get(text),
            })
            .collect()
    }

    /// Picks a canned response at random, records the pick, and asks the
    /// generator to expand it into a reply for `question`.
    pub async fn answer(
        &mut self,
        question: &str,
        generator: &dyn Generator,
        max_length: usize,
    ) -> Result<String> {
        let response = self
            .responses
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(StoreError::NoResponses)?;

        self.counts.increment(&response);
        self.save()?;
        debug!(%response, count = self.counts.get(&response), "selected response");

        let prompt = format!("Question: {question}\n{RESPONSE_MARKER}{response}\n");
        let generated = generator.generate(&prompt, max_length).await?;

        extract_reply(&generated)
    }

    pub fn save(&self) -> Result<()> {
        let snapshot = BaseFile {
            responses: self.responses.clone(),
            response_counts: self.counts.clone(),
        };
        files::write_json(&self.path, &snapshot)?;
        debug!(path = %self.path.display(), responses = self.responses.len(), "saved responses");
        Ok(())
    }
}

fn extract_reply(generated: &str) -> Result<String> {
    let (_, reply) = generated
        .split_once(RESPONSE_MARKER)
        .ok_or_else(|| StoreError::MalformedOutput {
            generated: generated.to_owned(),
        })?;

    Ok(reply.trim().to_owned())
}
